//! Implements a struct that holds the state of the server.

use std::time::Duration;

use axum::extract::FromRef;

use crate::session::{DEFAULT_SESSION_IDLE_TIMEOUT, SessionStore};

/// The default limit on the size of an uploaded file, 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Settings that control how the dashboard behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// The largest request body accepted by the upload route, in bytes.
    pub max_upload_bytes: usize,

    /// How long an uploaded dataset is kept after its session last used it.
    pub session_idle_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }
}

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The datasets of the sessions that have uploaded a file.
    pub sessions: SessionStore,

    /// The config the server was started with.
    pub config: DashboardConfig,
}

impl AppState {
    /// Create a new [AppState] with an empty session store.
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            sessions: SessionStore::with_idle_timeout(config.session_idle_timeout),
            config,
        }
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
