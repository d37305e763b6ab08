//! Sends introspection and per-tool execute requests to the upstream GraphQL endpoint.

use std::time::Duration;

use http::HeaderMap;
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;

use crate::errors::DispatchError;

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
}

/// A single GraphQL HTTP request: `query`/`variables`/`operationName` posted as JSON.
#[derive(Debug)]
pub struct GraphQlRequest {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Value,
}

impl Client {
    /// Builds a client with the given per-request timeout. Construction only fails if the
    /// underlying TLS/DNS resolver cannot be built, which `reqwest::Client::new`'s defaults never
    /// trigger, so this is infallible in practice.
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Client { http, endpoint }
    }

    /// Posts the standard introspection query and returns the raw `data` payload. Introspection
    /// is always a query, so errors are reported under that kind.
    #[instrument(skip(self, headers))]
    pub async fn introspect(&self, headers: &HeaderMap) -> Result<Value, DispatchError> {
        let request = GraphQlRequest {
            query: graphql_mcp_schema::parser::INTROSPECTION_QUERY.to_string(),
            operation_name: None,
            variables: Value::Object(Map::new()),
        };
        self.execute(request, "query", headers).await
    }

    /// Executes a synthesized operation and returns its `data` payload. GraphQL-level errors
    /// (a non-empty `errors` array) are translated into `DispatchError::GraphQl`. `kind` is the
    /// tool's operation kind (`"query"`/`"mutation"`), reported verbatim in error text.
    #[instrument(skip(self, request, headers), fields(operation_name = request.operation_name.as_deref()))]
    pub async fn execute(
        &self,
        request: GraphQlRequest,
        kind: &'static str,
        headers: &HeaderMap,
    ) -> Result<Value, DispatchError> {
        let mut body = Map::from_iter([
            (String::from("query"), Value::String(request.query)),
            (String::from("variables"), request.variables),
        ]);
        if let Some(name) = request.operation_name {
            body.insert(String::from("operationName"), Value::String(name));
        }

        let response = self
            .http
            .post(self.endpoint.as_str())
            .headers(headers.clone())
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|err| DispatchError::Transport {
                kind,
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Transport {
                kind,
                reason: format!("upstream returned {status}"),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|err| DispatchError::Decode(err.to_string()))?;

        match json.get("errors") {
            Some(Value::Array(errors)) if !errors.is_empty() => {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown error")
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(DispatchError::GraphQl { kind, messages })
            }
            _ => Ok(json.get("data").cloned().unwrap_or(Value::Null)),
        }
    }
}
