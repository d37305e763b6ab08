//! Wires configuration, schema introspection, the tool registry, and the request dispatcher
//! together behind an `rmcp::ServerHandler`.
//!
//! The Schema and Registry live behind one `RwLock`, swapped together on `refresh` so a dispatch
//! in flight always observes a matched pair, never a torn view (the reader/writer discipline
//! named for shared state).

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorCode, Implementation, InitializeRequestParams,
    InitializeResult, ListToolsResult, PaginatedRequestParams, ProtocolVersion, ServerCapabilities,
    ServerInfo, ToolsCapability,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, Peer, RoleServer, ServerHandler};
use tokio::sync::RwLock;

use graphql_mcp_schema::operation::SynthesizerConfig;
use graphql_mcp_schema::{derive_tools, parse_introspection, Schema};

use crate::client::Client;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::errors::ServerError;
use crate::headers::{build_request_headers, ForwardHeaders};
use crate::registry::{Registry, ToolFilter};

struct State {
    schema: Schema,
    registry: Registry,
    raw_introspection: serde_json::Value,
}

/// MCP server handler exposing a GraphQL endpoint's root fields as tools.
#[derive(Clone)]
pub struct Handler {
    state: Arc<RwLock<State>>,
    client: Client,
    static_headers: http::HeaderMap,
    passthru_headers: ForwardHeaders,
    synthesizer_config: Arc<SynthesizerConfig>,
    allow_list: Arc<Vec<String>>,
    block_list: Arc<Vec<String>>,
    peers: Arc<RwLock<Vec<Peer<RoleServer>>>>,
}

impl Handler {
    /// Introspects the configured endpoint, derives and filters tools, and returns a ready
    /// handler. This is the only fallible step; everything afterwards is in-memory.
    pub async fn bootstrap(config: &Config) -> Result<Self, ServerError> {
        let client = Client::new(config.endpoint.clone(), config.timeout);
        let (schema, registry, raw_introspection) = introspect_and_register(
            &client,
            &config.static_headers,
            &config.allow_list,
            &config.block_list,
        )
        .await?;

        Ok(Handler {
            state: Arc::new(RwLock::new(State {
                schema,
                registry,
                raw_introspection,
            })),
            client,
            static_headers: config.static_headers.clone(),
            passthru_headers: config.passthru_headers.clone(),
            synthesizer_config: Arc::new(SynthesizerConfig {
                max_depth: config.max_depth,
                skip_field_substrings: Vec::new(),
            }),
            allow_list: Arc::new(config.allow_list.clone()),
            block_list: Arc::new(config.block_list.clone()),
            peers: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Re-introspects the upstream endpoint and atomically replaces the schema and registry.
    /// Dispatches already in flight keep using the snapshot they started with.
    pub async fn refresh(&self) -> Result<(), ServerError> {
        let (schema, registry, raw_introspection) = introspect_and_register(
            &self.client,
            &self.static_headers,
            &self.allow_list,
            &self.block_list,
        )
        .await?;
        let mut state = self.state.write().await;
        *state = State {
            schema,
            registry,
            raw_introspection,
        };
        Ok(())
    }

    /// Renders the current schema as SDL, for the `/schema` HTTP endpoint.
    pub async fn schema_sdl(&self) -> String {
        graphql_mcp_schema::emit_sdl(&self.state.read().await.schema)
    }

    /// The raw introspection JSON captured at the last bootstrap/refresh, for `/schema`.
    pub async fn raw_schema_json(&self) -> serde_json::Value {
        self.state.read().await.raw_introspection.clone()
    }

    pub async fn schema_tool_count(&self) -> usize {
        self.state.read().await.registry.len()
    }

    pub async fn list_tools_json(&self) -> Vec<rmcp::model::Tool> {
        self.state.read().await.registry.list()
    }
}

async fn introspect_and_register(
    client: &Client,
    static_headers: &http::HeaderMap,
    allow_list: &[String],
    block_list: &[String],
) -> Result<(Schema, Registry, serde_json::Value), ServerError> {
    let data = client
        .introspect(static_headers)
        .await
        .map_err(|err| ServerError::Transport(err.to_string()))?;
    let schema = parse_introspection(&data)?;
    let tools = derive_tools(&schema);
    let filter = ToolFilter::new(allow_list, block_list);
    let registry = Registry::new(tools, &filter);
    Ok((schema, registry, data))
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(ErrorCode::METHOD_NOT_FOUND, format!("tool `{name}` not found"), None)
}

impl ServerHandler for Handler {
    async fn initialize(
        &self,
        _request: InitializeRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        self.peers.write().await.push(context.peer);
        Ok(self.get_info())
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let incoming_headers = context
            .extensions
            .get::<http::request::Parts>()
            .map(|parts| parts.headers.clone())
            .unwrap_or_default();
        let headers =
            build_request_headers(&self.static_headers, &self.passthru_headers, &incoming_headers);

        let state = self.state.read().await;
        let dispatcher = Dispatcher {
            schema: &state.schema,
            registry: &state.registry,
            client: &self.client,
            synthesizer_config: &self.synthesizer_config,
        };

        dispatcher
            .dispatch(request.name.as_ref(), request.arguments, &headers)
            .await
            .ok_or_else(|| tool_not_found(request.name.as_ref()))
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.state.read().await.registry.list(),
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            server_info: Implementation {
                name: "graphql-mcp-server".to_string(),
                icons: None,
                title: Some("GraphQL MCP Server".to_string()),
                version: std::env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                description: Some(
                    "Exposes a GraphQL endpoint's queries and mutations as MCP tools".to_string(),
                ),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(true),
                }),
                ..Default::default()
            },
            instructions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn schema_response() -> serde_json::Value {
        json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [{
                            "name": "hello",
                            "args": [],
                            "type": { "kind": "SCALAR", "name": "String" },
                        }],
                    },
                ],
            }
        })
    }

    async fn bootstrap_against(server: &mockito::ServerGuard) -> Handler {
        let config = Config {
            endpoint: Url::parse(&server.url()).unwrap(),
            static_headers: http::HeaderMap::new(),
            passthru_headers: vec![],
            allow_list: vec![],
            block_list: vec![],
            timeout: std::time::Duration::from_secs(30),
            max_depth: 5,
            transport: crate::config::Transport::Stdio,
        };
        Handler::bootstrap(&config).await.unwrap()
    }

    #[tokio::test]
    async fn bootstrap_derives_one_tool_per_query_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": schema_response() }).to_string())
            .create_async()
            .await;

        let handler = bootstrap_against(&server).await;
        assert_eq!(handler.schema_tool_count().await, 1);
        assert!(handler.schema_sdl().await.contains("type Query"));
    }

    #[tokio::test]
    async fn refresh_swaps_schema_and_registry_atomically() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": schema_response() }).to_string())
            .expect(2)
            .create_async()
            .await;

        let handler = bootstrap_against(&server).await;
        assert_eq!(handler.schema_tool_count().await, 1);
        handler.refresh().await.unwrap();
        assert_eq!(handler.schema_tool_count().await, 1);
    }
}
