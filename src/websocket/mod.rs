use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::info;
use uuid::Uuid;

use crate::models::AppState;

pub mod coordinator;
pub mod game_handlers;
pub mod handler;
pub mod sessions;

pub use coordinator::Coordinator;
pub use handler::ChessWebSocket;
pub use sessions::{Binding, ConnectionId, Delivery, DeliveryError, Outbox, Outcome, SessionTable};

/// WebSocket connection handler
pub async fn ws_index(req: HttpRequest, stream: web::Payload, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    let ws = ChessWebSocket {
        id,
        coordinator: app_state.coordinator.clone(),
    };

    ws::start(ws, &req, stream)
}
