//! Shared application state.

use std::sync::Arc;

use booking_db::Database;

use crate::config::ServerConfig;
use crate::services::mailer::Mailer;

/// State shared across all request handlers via axum `State`.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (internally pooled, cheap to clone).
    pub db: Database,

    /// Notification mailer. Disabled when SMTP is unconfigured.
    pub mailer: Arc<Mailer>,

    /// Loaded server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, mailer: Mailer, config: ServerConfig) -> Self {
        AppState {
            db,
            mailer: Arc::new(mailer),
            config: Arc::new(config),
        }
    }
}
