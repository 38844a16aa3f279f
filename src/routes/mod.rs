use actix_web::{web, HttpResponse, Responder};

/// HTTP handler for the index page
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Chess session server: connect a websocket to /ws")
}

/// Liveness probe
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/").route(web::get().to(index)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn health_and_index_respond() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"ok");

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_rt::test]
    async fn websocket_route_requires_upgrade() {
        use crate::models::AppState;
        use crate::store::MemoryStore;
        use crate::websocket::{Coordinator, SessionTable};
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let state = web::Data::new(AppState {
            coordinator: Arc::new(Coordinator::new(Arc::new(SessionTable::new()), store.clone(), store)),
        });
        let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

        // A plain GET without the websocket handshake headers is refused.
        let req = test::TestRequest::get().uri("/ws").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
