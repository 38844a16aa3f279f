use actix_web::{web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

use chess_session_server::config::{load_seed, ServerConfig};
use chess_session_server::models::AppState;
use chess_session_server::routes::configure_routes;
use chess_session_server::store::MemoryStore;
use chess_session_server::websocket::{Coordinator, SessionTable};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();

    let store = match &config.seed_file {
        Some(path) => {
            let seed = load_seed(path).map_err(|e| {
                error!("{}", e);
                std::io::Error::new(std::io::ErrorKind::InvalidData, e)
            })?;
            MemoryStore::from_seed(seed)
        }
        None => {
            info!("No seed file configured, starting with an empty store");
            MemoryStore::new()
        }
    };
    let store = Arc::new(store);

    // Create shared application state
    let app_state = web::Data::new(AppState {
        coordinator: Arc::new(Coordinator::new(
            Arc::new(SessionTable::new()),
            store.clone(),
            store,
        )),
    });

    info!("Starting chess session server at http://{}", config.bind_addr);

    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(configure_routes))
        .bind(config.bind_addr.as_str())?
        .run()
        .await
}
