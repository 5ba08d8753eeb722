use std::sync::Arc;

use playora_backend::Backend;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Hosted backend services (records, storage, auth).
    pub backend: Backend,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
