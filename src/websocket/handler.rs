use actix::prelude::SendError;
use actix::*;
use actix_web_actors::ws;
use log::{info, warn};
use std::sync::Arc;

use crate::error::ServerError;
use crate::models::{ChessWebSocketMessage, CloseConnection, ServerMessage};
use crate::websocket::coordinator::Coordinator;
use crate::websocket::sessions::{ConnectionId, DeliveryError, Outbox};

/// WebSocket actor for one connection
pub struct ChessWebSocket {
    pub id: ConnectionId,
    pub coordinator: Arc<Coordinator>,
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor's mailbox with the session table
        let outbox = ActorOutbox(ctx.address());
        self.coordinator.open(&self.id, Arc::new(outbox));
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.coordinator.close(&self.id);
        Running::Stop
    }
}

impl Handler<ChessWebSocketMessage> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ChessWebSocketMessage, ctx: &mut Self::Context) {
        info!("Forwarding message to client {}: {}", self.id, msg.0);
        ctx.text(msg.0);
    }
}

impl Handler<CloseConnection> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, _: CloseConnection, ctx: &mut Self::Context) {
        ctx.close(Some(ws::CloseCode::Normal.into()));
        ctx.stop();
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                self.coordinator.dispatch(&self.id, &text);
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                let error = ServerError::Protocol("binary messages are not supported".to_string());
                match serde_json::to_string(&ServerMessage::error(&error)) {
                    Ok(text) => ctx.text(text),
                    Err(e) => warn!("Failed to serialize error reply: {}", e),
                }
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection {} closed: {:?}", self.id, reason);
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(e) => {
                warn!("Protocol failure on {}: {}", self.id, e);
                ctx.stop();
            }
        }
    }
}

/// Routes coordinator output into an actor's mailbox.
struct ActorOutbox(Addr<ChessWebSocket>);

impl Outbox for ActorOutbox {
    fn send(&self, text: String) -> Result<(), DeliveryError> {
        match self.0.try_send(ChessWebSocketMessage(text)) {
            Ok(()) => Ok(()),
            Err(SendError::Full(_)) => Err(DeliveryError("mailbox is full".to_string())),
            Err(SendError::Closed(_)) => Err(DeliveryError("connection is closed".to_string())),
        }
    }

    fn close(&self) {
        self.0.do_send(CloseConnection);
    }
}
