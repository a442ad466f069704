use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roster::config::AppConfig;
use roster::database::RosterStore;
use roster::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster=info,tower_http=info")),
        )
        .init();

    // 2. Roster store, seeded once at startup
    let config = AppConfig::from_env();
    let seed = config.load_seed()?;
    info!("Connecting to roster database: {}", config.database_url);
    let store = RosterStore::open(&config.database_url, &seed)
        .await
        .context("cannot open roster store")?;

    // 3. Application
    let app = web::build_router(store, &config.assets_dir);

    // 4. Serve, falling back to the next port if ours is taken
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("cannot parse host/port {}:{}", config.host, config.port))?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback_port = config.port.wrapping_add(1);
            warn!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                addr, e, config.host, fallback_port
            );
            let fallback: SocketAddr = format!("{}:{}", config.host, fallback_port)
                .parse()
                .context("cannot parse fallback address")?;
            tokio::net::TcpListener::bind(fallback)
                .await
                .context("cannot bind fallback port")?
        }
    };

    info!("Roster server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
