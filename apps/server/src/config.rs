//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. SMTP settings are optional: with no SMTP host configured the
//! mailer runs disabled and submission emails are skipped with a warning.

use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// SMTP relay host (empty = email disabled)
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,

    /// SMTP username (optional, no auth when absent)
    pub smtp_username: Option<String>,

    /// SMTP password
    pub smtp_password: Option<String>,

    /// Use STARTTLS for SMTP
    pub smtp_tls: bool,

    /// From address for notification emails
    pub email_from: String,

    /// Directory of tera email templates (optional, built-in fallback)
    pub template_dir: Option<String>,

    /// Seconds between booking status refresh runs
    pub status_refresh_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./booking.db".to_string()),

            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),

            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SMTP_PORT".to_string()))?,

            smtp_username: env::var("SMTP_USERNAME").ok(),

            smtp_password: env::var("SMTP_PASSWORD").ok(),

            smtp_tls: env::var("SMTP_TLS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),

            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Booking Suite <noreply@localhost>".to_string()),

            template_dir: env::var("TEMPLATE_DIR").ok(),

            status_refresh_interval_secs: env::var("STATUS_REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string()) // 5 minutes
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("STATUS_REFRESH_INTERVAL_SECS".to_string())
                })?,
        };

        // Auth needs both halves
        if config.smtp_username.is_some() != config.smtp_password.is_some() {
            return Err(ConfigError::PartialSmtpCredentials);
        }

        Ok(config)
    }

    /// Whether email delivery is configured at all.
    pub fn email_enabled(&self) -> bool {
        !self.smtp_host.is_empty()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("SMTP_USERNAME and SMTP_PASSWORD must be set together")]
    PartialSmtpCredentials,

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
