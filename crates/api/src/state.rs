use std::sync::Arc;

use bugrelay_tracker::GitHubTracker;

use crate::config::ServerConfig;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Everything inside is immutable after startup, so cloning is cheap and no
/// locking is needed between concurrent requests.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Issue tracker client (pooled HTTP connections).
    pub tracker: Arc<GitHubTracker>,
    /// Upload directory and policy.
    pub uploads: Arc<UploadStore>,
}
