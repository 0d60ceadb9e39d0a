//! HTTP server implementation using Axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, Result};
use crate::proto::{RpcRequest, RpcResponse};

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

async fn handle_rpc(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    Json(state.dispatcher.handle(request).await)
}

async fn handle_health() -> &'static str {
    "ok"
}

/// Start the bridge RPC server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_http_server(
    dispatcher: Arc<Dispatcher>,
    host: &str,
    port: u16,
) -> Result<SocketAddr> {
    let state = AppState { dispatcher };

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/rpc", post(handle_rpc))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| BridgeError::config(format!("bind address: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BridgeError::transport(format!("bind {addr}: {e}")))?;
    let actual_addr = listener
        .local_addr()
        .map_err(|e| BridgeError::transport(e.to_string()))?;

    tracing::info!("bridge server listening on {actual_addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("bridge server exited: {e}");
        }
    });

    Ok(actual_addr)
}
