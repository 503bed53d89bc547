//! Runtime configuration, read from the environment
//!
//! Everything is an explicit struct handed to constructors; the core
//! keeps no process-wide configuration state.

use std::env;

/// SMTP settings for the notification mailer.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub use_tls: bool,
}

impl MailConfig {
    /// Create a new MailConfig from environment variables.
    pub fn from_env() -> Self {
        Self {
            smtp_host: env::var("QDOC_SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env::var("QDOC_SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("QDOC_SMTP_USER").ok(),
            smtp_password: env::var("QDOC_SMTP_PASSWORD").ok(),
            use_tls: env::var("QDOC_SMTP_TLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// Top-level configuration injected into the core at construction.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// From-address used for outbound notifications
    pub notification_address: String,
    pub mail: MailConfig,
}

impl CoreConfig {
    /// Create a new CoreConfig from environment variables.
    pub fn from_env() -> Self {
        Self {
            notification_address: env::var("QDOC_NOTIFY_ADDRESS")
                .unwrap_or_else(|_| "quadro <notify@localhost>".to_string()),
            mail: MailConfig::from_env(),
        }
    }
}
