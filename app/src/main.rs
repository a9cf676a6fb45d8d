use anyhow::Context;
use daigou_ledger::backend::config::{resolve_data_directory, AppConfig};
use daigou_ledger::{create_router, initialize_backend};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_dir = resolve_data_directory()?;
    info!("📂 Data directory: {:?}", data_dir);

    let config = AppConfig::load(&data_dir)?;
    let app_state = initialize_backend(&config, &data_dir)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("binding {}", config.bind_address))?;
    info!("🚀 Daigou ledger API listening on http://{}", config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
