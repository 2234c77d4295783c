//! Application state management
//!
//! Shared state handed to every request handler through Axum's state
//! extraction. Everything in it is cheap to clone.

use crate::auth::JwtService;
use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT verifier with cached keys
    pub jwt: JwtService,
    /// Prometheus handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// JWT keys are derived from the config secret here, so call this once
    /// at startup.
    pub fn new(db: PgPool, config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        let jwt = JwtService::new(&config.jwt.secret);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            metrics,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
