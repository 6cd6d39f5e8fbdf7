mod auth;
mod config;
mod error;
mod export;
mod server;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use wedding_common::store::GuestStore;

use config::Config;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting wedding-backend");

    let config = Config::from_env()?;
    info!(
        data_dir = %config.data_dir.display(),
        listen_addr = %config.listen_addr,
        api_key = config.api_key.is_some(),
        "configuration loaded"
    );
    if config.api_key.is_none() {
        warn!("WEDDING_API_KEY is not set, every guest request will be rejected");
    }

    let store = GuestStore::new(config.guests_file_path());
    store.ensure_exists().await?;
    info!(path = %store.path().display(), "guest store ready");

    let listen_addr = config.listen_addr;
    let app = server::router(AppState::new(config, store));

    let listener = TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listen_addr, "HTTP server ready");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}
