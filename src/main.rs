use std::sync::Arc;

use anyhow::Context;

use pattern_dashboard::commands::{create_router, AppState};
use pattern_dashboard::utils::config;
use pattern_dashboard::{PatternClient, PatternState, Poller, APP_NAME};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = config::load_settings().context("invalid dashboard settings")?;
    let client = PatternClient::from_settings(&settings).context("failed to build HTTP client")?;

    // Bind before starting the poller so a bad address never leaves a timer running.
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    let state = Arc::new(PatternState::new());
    let poller = Arc::new(Poller::start(client, settings.refresh_interval(), state));
    let app = create_router(AppState::new(Arc::clone(&poller), &settings, APP_NAME));

    log::info!("[Server] Dashboard listening on http://{}", settings.bind_addr);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    poller.stop();
    served.context("dashboard server failed")?;
    log::info!("[Server] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
