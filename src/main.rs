use anyhow::Context;
use tokio::net::TcpListener;

use retira_backend::core::config::{AppPaths, Settings};
use retira_backend::core::logging;
use retira_backend::server::router::router;
use retira_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let paths = AppPaths::new();
    logging::init(&paths);
    let settings = Settings::load(&paths);

    tracing::info!("Starting retirement chat backend");
    tracing::info!("Model: {}", settings.model.name);
    tracing::info!(
        "Pricing - Input: ${:.6}/token, Output: ${:.6}/token",
        settings.pricing.input_price_per_token,
        settings.pricing.output_price_per_token
    );
    if settings.model.api_key.is_empty() {
        tracing::warn!("GOOGLE_API_KEY is not set; generation requests will fail");
    }

    let bind_addr = settings.bind_addr();
    let state = AppState::new(settings);
    tracing::info!("Provider: {}", state.provider.name());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
