use rmcp::{transport::stdio, ServiceExt as _};
use tracing::{error, info};

use crate::errors::ServerError;
use crate::server::Handler;

/// Serves `handler` over line-framed JSON-RPC on stdin/stdout until the peer disconnects.
pub async fn serve(handler: Handler) -> Result<(), ServerError> {
    info!("starting MCP server in stdio mode");
    let service = handler
        .serve(stdio())
        .await
        .inspect_err(|err| error!("serving error: {err:?}"))
        .map_err(|err| ServerError::Transport(err.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|err| ServerError::Transport(err.to_string()))?;
    Ok(())
}
