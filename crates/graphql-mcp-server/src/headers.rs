use std::str::FromStr;

use http::{HeaderMap, HeaderName};

/// List of inbound header names to forward from MCP clients to the upstream GraphQL endpoint.
pub type ForwardHeaders = Vec<String>;

/// Builds headers for an upstream GraphQL request by combining static configured headers with
/// the subset of inbound headers named in `forward_header_names`.
pub fn build_request_headers(
    static_headers: &HeaderMap,
    forward_header_names: &ForwardHeaders,
    incoming_headers: &HeaderMap,
) -> HeaderMap {
    let mut headers = static_headers.clone();

    forward_headers(forward_header_names, incoming_headers, &mut headers);

    if let Some(session_id) = incoming_headers.get("mcp-session-id") {
        headers.insert("mcp-session-id", session_id.clone());
    }

    headers
}

/// Forwards matching headers from incoming to outgoing. Names are matched case-insensitively;
/// hop-by-hop headers are never forwarded even if named explicitly, per RFC 7230 §6.1.
fn forward_headers(names: &[String], incoming: &HeaderMap, outgoing: &mut HeaderMap) {
    for header in names {
        if let Ok(header_name) = HeaderName::from_str(header)
            && let Some(value) = incoming.get(&header_name)
            && !matches!(
                header_name.as_str().to_lowercase().as_str(),
                "connection"
                    | "keep-alive"
                    | "proxy-authenticate"
                    | "proxy-authorization"
                    | "te"
                    | "trailers"
                    | "transfer-encoding"
                    | "upgrade"
                    | "content-length"
            )
        {
            outgoing.insert(header_name, value.clone());
        }
    }
}
