use std::sync::Arc;

use vto_batch::BatchCoordinator;
use vto_core::invoker::TryOnInvoker;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Batch coordinator (session registry + dispatch runs).
    pub coordinator: Arc<BatchCoordinator>,
    /// Remote try-on invoker, used directly by the single try-on route.
    pub invoker: Arc<dyn TryOnInvoker>,
}
