//! HTTP Server
//!
//! Axum-based HTTP server exposing the ledger.

use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::rpc::methods::{create_book, get_chain, health, validate_chain, write_block, RpcState};

/// Build the router with all routes, CORS, and request tracing
pub fn create_router(state: RpcState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(get_chain))
        .route("/new", post(create_book))
        .route("/writeBlock", post(write_block))
        .route("/validate", get(validate_chain))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the ledger on `addr` until `shutdown` resolves
pub async fn start_rpc_server<F>(state: RpcState, addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
