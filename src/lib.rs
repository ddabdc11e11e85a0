pub mod analysis; // Prompt builder, gateway client, reply normalizer
pub mod api; // HTTP surface: /analyze, /feedback, /health
pub mod chart; // History → chart series
pub mod config;
pub mod db;
pub mod feedback; // Feedback board
pub mod flow; // Wizard submission → backend → history
pub mod i18n;
pub mod models;
pub mod session; // Local profile + history store
pub mod wizard; // 5-step intake state machine

use tracing_subscriber::EnvFilter;

/// Serve the analysis API until Ctrl-C.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let server_config = config::ServerConfig::from_env().map_err(|e| e.to_string())?;
    let ctx = api::ApiContext::from_config(&server_config).map_err(|e| e.to_string())?;
    let mut server = api::start_server(ctx, server_config.bind_addr).await?;
    tracing::info!(url = %server.base_url(), "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.stopped().await;
    Ok(())
}
