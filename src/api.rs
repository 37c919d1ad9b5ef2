//! HTTP API for the assistant

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::gateway::ModelGateway;
use crate::session::SessionStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub gateway: Arc<ModelGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            gateway,
        }
    }
}
