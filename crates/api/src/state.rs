use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the config sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pagewright_db::DbPool,
    /// Server configuration (JWT secret is read by the auth extractors).
    pub config: Arc<ServerConfig>,
}
