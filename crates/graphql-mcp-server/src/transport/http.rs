use std::net::SocketAddr;

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::json;
use tracing::info;

use crate::cors::permissive_cors_layer;
use crate::errors::ServerError;
use crate::server::Handler;

/// Binds `address` and serves `handler` over streamable HTTP until the process is asked to
/// shut down. Runs forever; the caller spawns this on its own task if it wants to do anything
/// else concurrently.
pub async fn serve(handler: Handler, address: SocketAddr) -> Result<(), ServerError> {
    let factory_handler = handler.clone();
    let mcp_service = StreamableHttpService::new(
        move || Ok(factory_handler.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let router = aux_router(handler)
        .nest_service("/mcp", mcp_service)
        .layer(permissive_cors_layer())
        .layer(axum::middleware::from_fn(crate::cors::preflight));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|err| ServerError::Bind(address, err))?;

    info!(%address, "starting MCP server in streamable HTTP mode");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Io)
}

/// Resolves on Ctrl+C or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// The `/health`, `/schema`, and `/tools` routes, factored out so tests can drive them with
/// `tower::ServiceExt::oneshot` without standing up a real `/mcp` session factory.
fn aux_router(handler: Handler) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schema", get(schema))
        .route("/tools", get(tools))
        .with_state(handler)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "graphql-mcp-server" }))
}

async fn schema(State(handler): State<Handler>) -> Json<serde_json::Value> {
    Json(json!({
        "schema": handler.raw_schema_json().await,
        "sdl": handler.schema_sdl().await,
    }))
}

async fn tools(State(handler): State<Handler>) -> Json<serde_json::Value> {
    let tools = handler.list_tools_json().await;
    let count = tools.len();
    let tools: Vec<_> = tools
        .into_iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "type": "object",
                "inputSchema": tool.input_schema,
            })
        })
        .collect();
    Json(json!({ "tools": tools, "count": count }))
}
