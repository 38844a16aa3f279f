use std::sync::Arc;

use crate::websocket::Coordinator;

/// Application state shared between connections
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}
