use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mycar_catalog::{AppState, config::Settings, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "mycar_catalog=info,tower_http=info".into()))
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing MyCar catalog gateway...");

    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!(backend_url = %s.backend_url, "Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = settings
        .server_address
        .parse()
        .with_context(|| format!("Invalid server address format: {}", settings.server_address))?;

    let http_client = Client::builder()
        .user_agent(concat!("mycar-catalog/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build shared reqwest client")?;

    let app_state = AppState::new(settings, http_client);
    let app = routes::create_router(app_state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
