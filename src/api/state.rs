//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::QueryBackend;
use crate::translate::Dialect;

use super::auth::Credentials;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Executes translated SQL
    pub backend: Arc<dyn QueryBackend>,
    /// Dialect the translator targets
    pub dialect: Dialect,
    /// Expected query credentials
    pub credentials: Arc<Credentials>,
    /// Name reported for the result serie
    pub series_name: Arc<str>,
    /// Requests running longer than this are cancelled
    pub request_timeout: Duration,
}

impl AppState {
    /// Create state with default series name and request timeout
    pub fn new(backend: Arc<dyn QueryBackend>, dialect: Dialect, credentials: Credentials) -> Self {
        Self {
            backend,
            dialect,
            credentials: Arc::new(credentials),
            series_name: Arc::from("SerieNameNbr1"),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Create state from loaded configuration
    pub fn from_config(backend: Arc<dyn QueryBackend>, config: &Config) -> Self {
        Self::new(
            backend,
            config.database.driver,
            Credentials::new(&config.auth.username, &config.auth.password),
        )
        .with_series_name(&config.server.series_name)
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs))
    }

    /// Set the reported serie name
    pub fn with_series_name(mut self, name: &str) -> Self {
        self.series_name = Arc::from(name);
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
