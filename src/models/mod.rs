pub mod analysis;
pub mod enums;
pub mod feedback;
pub mod flexible;
pub mod intake;
pub mod prescription;
pub mod profile;

pub use analysis::*;
pub use feedback::*;
pub use intake::*;
pub use prescription::*;
pub use profile::*;
