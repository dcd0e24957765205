use tracing_subscriber::EnvFilter;

use vendor_intake::api;
use vendor_intake::config::Config;
use vendor_intake::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Upload directory: {}", config.upload_dir.display());
    if config.llm.is_configured() {
        tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    } else {
        tracing::info!("No LLM provider configured; using keyword scoring only");
    }

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
