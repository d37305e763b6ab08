use thiserror::Error;

/// Errors that can abort process startup. These are fatal: the process exits on any of them.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to introspect upstream schema: {0}")]
    InvalidSchema(#[from] graphql_mcp_schema::SchemaError),

    #[error("failed to read configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid header name `{0}`")]
    HeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    HeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("malformed header `{0}`, expected `name: value`")]
    MalformedHeader(String),

    #[error("missing required configuration value `endpoint`")]
    MissingEndpoint,

    #[error("failed to bind listener on {0}: {1}")]
    Bind(std::net::SocketAddr, #[source] std::io::Error),

    #[error("server failed while running: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start MCP transport: {0}")]
    Transport(String),
}

/// Errors surfaced while dispatching a single tool call. The dispatcher (`dispatcher.rs`) never
/// propagates these out of a call: each variant is translated into an error `CallToolResult`,
/// per the propagation policy.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("GraphQL {kind} failed: {reason}")]
    Transport { kind: &'static str, reason: String },

    #[error("GraphQL {kind} errors: {messages}")]
    GraphQl { kind: &'static str, messages: String },

    #[error("failed to decode GraphQL response: {0}")]
    Decode(String),

    #[error("request was cancelled before completion")]
    Cancelled,

    #[error("failed to synthesize operation: {0}")]
    Synthesis(#[from] graphql_mcp_schema::SynthesisError),
}
