//! Repository layer — entity-scoped database operations.

mod feedback;

pub use feedback::*;
