//! Prompt builder and response normalizer for the analysis function.
//!
//! Renders the model instructions from the collected wizard data, calls the
//! text-generation gateway, and coerces the free-text reply into the fixed
//! assessment shape. Callers always get an `AnalysisOutcome` that says
//! whether the record came from the model, from the fallback substitute, or
//! whether the call failed outright.

pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod types;

pub use gateway::*;
pub use parser::*;
pub use prompt::*;
pub use service::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    MissingApiKey(&'static str),

    #[error("AI gateway unreachable at {0}")]
    Connection(String),

    #[error("AI gateway request timed out after {0}s")]
    Timeout(u64),

    #[error("AI gateway returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl GatewayError {
    /// How the failure is surfaced to callers of the analysis function.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            GatewayError::Status { status: 429, .. } => FailureKind::RateLimited,
            GatewayError::Status { status: 402, .. } => FailureKind::PaymentRequired,
            _ => FailureKind::Internal,
        }
    }
}
