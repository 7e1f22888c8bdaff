use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bugrelay_api::config::{LogFormat, ServerConfig};
use bugrelay_api::router::build_app_router;
use bugrelay_api::state::AppState;
use bugrelay_api::storage::UploadStore;
use bugrelay_tracker::GitHubTracker;

const DEFAULT_LOG_FILTER: &str = "bugrelay_api=debug,bugrelay_tracker=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        upload_dir = %config.upload_dir.display(),
        max_upload_bytes = config.upload_policy.max_bytes(),
        "Loaded server configuration",
    );

    // --- Issue tracker ---
    let tracker = GitHubTracker::new(
        &config.github.api_url,
        config.github.token.clone(),
        config.github.repository.as_deref(),
        Duration::from_secs(config.github.timeout_secs),
    )
    .expect("Invalid issue tracker configuration");

    match tracker.repo() {
        Some(repo) if tracker.is_configured() => {
            tracing::info!(%repo, "Issue tracker configured");
        }
        _ => tracing::warn!("GITHUB_TOKEN or GITHUB_REPO not set; report submissions will fail"),
    }

    // --- Upload directory ---
    let uploads = UploadStore::open(&config.upload_dir, config.upload_policy.clone())
        .await
        .expect("Failed to create upload directory");
    tracing::info!(dir = %uploads.dir().display(), "Upload directory ready");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        tracker: Arc::new(tracker),
        uploads: Arc::new(uploads),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
