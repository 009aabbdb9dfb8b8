use map_pins_server::{load_locations, start_server, AppState, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServerConfig::from_env();
    let locations = match &cfg.data_path {
        Some(path) => load_locations(path)?,
        None => {
            tracing::warn!("PINS_DATA not set, serving an empty location set");
            Vec::new()
        }
    };
    let state = Arc::new(AppState::new(cfg.clustering.clone(), locations)?);

    let handle = start_server(cfg, state).await?;
    // Park forever
    handle.await.ok();
    Ok(())
}
