//! Shared state for the API layer.

use std::sync::Arc;

use crate::analysis::{AnalysisService, GatewayClient, LlmClient};
use crate::config::ServerConfig;
use crate::db;
use crate::feedback::{FeedbackBoard, FeedbackError};

/// Shared context for all API routes and middleware.
/// Cheap to clone; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct ApiContext {
    pub analysis: AnalysisService,
    pub feedback: Arc<FeedbackBoard>,
    pub gateway_configured: bool,
}

impl ApiContext {
    pub fn new(
        client: Arc<dyn LlmClient + Send + Sync>,
        feedback: FeedbackBoard,
        gateway_configured: bool,
    ) -> Self {
        Self {
            analysis: AnalysisService::new(client),
            feedback: Arc::new(feedback),
            gateway_configured,
        }
    }

    /// Production context: gateway client plus the on-disk feedback store.
    pub fn from_config(config: &ServerConfig) -> Result<Self, FeedbackError> {
        let client = GatewayClient::new(&config.gateway);
        let configured = client.has_api_key();
        if !configured {
            tracing::warn!(
                "{} is not set; analysis requests will fail",
                crate::config::GATEWAY_KEY_ENV
            );
        }
        let conn = db::open_database(&config.feedback_db)?;
        Ok(Self::new(Arc::new(client), FeedbackBoard::new(conn), configured))
    }
}
