//! Transport adapters that expose a bootstrapped [`crate::server::Handler`] to MCP clients.

pub mod http;
pub mod stdio;
