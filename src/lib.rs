pub mod config;
pub mod error;
pub mod http;
pub mod room;
pub mod websocket;

use axum::{http::Method, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use config::Config;
use error::WhiteboardError;
use room::RoomEngine;
use websocket::Gateway;

/// Build the application router around a fresh room engine
pub fn app(config: &Config) -> Result<Router, WhiteboardError> {
    router(Gateway::new(RoomEngine::new()), config)
}

/// Build the application router for an existing gateway
pub fn router(gateway: Gateway, config: &Config) -> Result<Router, WhiteboardError> {
    let cors = CorsLayer::new()
        .allow_origin(config.origin_headers()?)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Ok(Router::new()
        .route("/", get(http::health))
        .route("/rooms", get(http::rooms))
        .route("/ws", get(websocket::handler::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(gateway))
}
