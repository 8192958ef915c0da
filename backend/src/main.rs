use anyhow::Context;
use pagedesk::application::services::PageService;
use pagedesk::config::{AppConfig, DatabaseLocation};
use pagedesk::infrastructure::http::{router, AppState};
use pagedesk::infrastructure::persistence::SqlitePageRepository;
use tokio::net::TcpListener;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over PAGEDESK_LOG when set
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .with_context(|| format!("invalid log filter {:?}", config.log_filter))?,
    };
    let _ = fmt().with_env_filter(filter).with_target(false).finish().try_init();

    let repository = match &config.database {
        DatabaseLocation::InMemory => {
            tracing::warn!("Using in-memory store; pages are lost on exit");
            SqlitePageRepository::new_in_memory()
        }
        DatabaseLocation::File(path) => {
            tracing::info!("Opening page store at {}", path.display());
            SqlitePageRepository::new_with_path(path)
        }
    }
    .context("failed to open page store")?;

    let state = AppState::new(PageService::new(repository));
    let app = router(state, config.max_upload_bytes);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
