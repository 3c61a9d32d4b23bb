// Gateway entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config, seeding config/ from defaults/ on first run
// 3. Resolve secrets (APP_PASSWORD / SHEET_URL over credentials.toml)
// 4. Serve POST /get-data until Ctrl+C

use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};

use showcase_core::config;
use showcase_gateway::{router, GatewayState, DATA_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = config::load_config().context("failed to load configuration")?;
    let state = GatewayState::from_config(
        &config,
        std::env::var("APP_PASSWORD").ok(),
        std::env::var("SHEET_URL").ok(),
    );
    if state.password.is_none() {
        warn!("no app password configured; every login will be rejected");
    }
    if state.sheet_url.is_none() {
        warn!("no sheet URL configured; authorized requests will fail");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.gateway.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("gateway listening on http://{addr}{DATA_PATH}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server failed")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("showcase_gateway=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
