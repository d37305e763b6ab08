//! Finds the tool matching an incoming call, synthesizes its operation, executes it against the
//! upstream endpoint, and translates every failure mode into a `CallToolResult` rather than
//! propagating an error out of the call — per the error-envelope policy.

use http::HeaderMap;
use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::{Client, GraphQlRequest};
use crate::errors::DispatchError;
use crate::registry::Registry;
use graphql_mcp_schema::operation::{synthesize_operation, SynthesizerConfig};
use graphql_mcp_schema::Schema;

pub struct Dispatcher<'a> {
    pub schema: &'a Schema,
    pub registry: &'a Registry,
    pub client: &'a Client,
    pub synthesizer_config: &'a SynthesizerConfig,
}

impl Dispatcher<'_> {
    /// Dispatches a single tool call. Returns `None` when `tool_name` is not registered, so the
    /// caller can fall through to other tool-name handling before reporting "not found".
    #[instrument(skip(self, arguments, headers), fields(tool_name))]
    pub async fn dispatch(
        &self,
        tool_name: &str,
        arguments: Option<Map<String, Value>>,
        headers: &HeaderMap,
    ) -> Option<CallToolResult> {
        let tool = self.registry.find(tool_name)?;

        let query = match synthesize_operation(
            self.schema,
            &tool.field,
            tool.operation_kind,
            self.synthesizer_config,
        ) {
            Ok(query) => query,
            Err(err) => return Some(error_result(DispatchError::Synthesis(err))),
        };

        let request = GraphQlRequest {
            query,
            operation_name: None,
            variables: Value::Object(arguments.unwrap_or_default()),
        };

        Some(match self.client.execute(request, tool.operation_kind.as_str(), headers).await {
            Ok(data) => success_result(data),
            Err(err) => error_result(err),
        })
    }
}

fn success_result(data: Value) -> CallToolResult {
    let pretty = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
    CallToolResult {
        content: vec![Content::text(pretty)],
        is_error: Some(false),
        meta: None,
        structured_content: Some(data),
    }
}

fn error_result(err: DispatchError) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(err.to_string())],
        is_error: Some(true),
        meta: None,
        structured_content: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolFilter;
    use graphql_mcp_schema::parser::parse_introspection;
    use graphql_mcp_schema::tool::derive_tools;
    use serde_json::json;
    use url::Url;

    fn test_schema() -> Schema {
        let introspection = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [{
                            "name": "widget",
                            "args": [{
                                "name": "id",
                                "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "ID" } },
                            }],
                            "type": { "kind": "OBJECT", "name": "Widget" },
                        }],
                    },
                    {
                        "kind": "OBJECT",
                        "name": "Widget",
                        "fields": [
                            { "name": "id", "args": [], "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "ID" } } },
                            { "name": "name", "args": [], "type": { "kind": "SCALAR", "name": "String" } },
                        ],
                    },
                ],
            }
        });
        parse_introspection(&introspection).unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_returns_none() {
        let schema = test_schema();
        let tools = derive_tools(&schema);
        let registry = Registry::new(tools, &ToolFilter::default());
        let client = Client::new(Url::parse("http://localhost:4000").unwrap(), std::time::Duration::from_secs(30));
        let config = SynthesizerConfig::default();
        let dispatcher = Dispatcher {
            schema: &schema,
            registry: &registry,
            client: &client,
            synthesizer_config: &config,
        };

        let result = dispatcher
            .dispatch("query_missing", None, &HeaderMap::new())
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn successful_call_returns_non_error_result_with_structured_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": { "widget": { "id": "1", "name": "gizmo" } } }).to_string())
            .create_async()
            .await;

        let schema = test_schema();
        let tools = derive_tools(&schema);
        let registry = Registry::new(tools, &ToolFilter::default());
        let client = Client::new(Url::parse(&server.url()).unwrap(), std::time::Duration::from_secs(30));
        let config = SynthesizerConfig::default();
        let dispatcher = Dispatcher {
            schema: &schema,
            registry: &registry,
            client: &client,
            synthesizer_config: &config,
        };

        let mut args = Map::new();
        args.insert("id".to_string(), json!("1"));
        let result = dispatcher
            .dispatch("query_widget", Some(args), &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert!(result.structured_content.is_some());
    }

    #[tokio::test]
    async fn graphql_errors_are_surfaced_as_error_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": null, "errors": [{ "message": "widget not found" }] }).to_string())
            .create_async()
            .await;

        let schema = test_schema();
        let tools = derive_tools(&schema);
        let registry = Registry::new(tools, &ToolFilter::default());
        let client = Client::new(Url::parse(&server.url()).unwrap(), std::time::Duration::from_secs(30));
        let config = SynthesizerConfig::default();
        let dispatcher = Dispatcher {
            schema: &schema,
            registry: &registry,
            client: &client,
            synthesizer_config: &config,
        };

        let mut args = Map::new();
        args.insert("id".to_string(), json!("1"));
        let result = dispatcher
            .dispatch("query_widget", Some(args), &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
        assert!(
            result
                .content
                .first()
                .and_then(|c| c.as_text())
                .is_some_and(|t| t.text.contains("widget not found"))
        );
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced_as_error_result() {
        let schema = test_schema();
        let tools = derive_tools(&schema);
        let registry = Registry::new(tools, &ToolFilter::default());
        let client = Client::new(Url::parse("http://127.0.0.1:0/no-server").unwrap(), std::time::Duration::from_secs(1));
        let config = SynthesizerConfig::default();
        let dispatcher = Dispatcher {
            schema: &schema,
            registry: &registry,
            client: &client,
            synthesizer_config: &config,
        };

        let result = dispatcher
            .dispatch("query_widget", None, &HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
    }
}
