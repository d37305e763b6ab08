use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use graphql_mcp_server::config::{Args, Config, Transport};
use graphql_mcp_server::server::Handler;
use graphql_mcp_server::transport::{http, stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();

    info!("graphql-mcp-server v{}", std::env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = Config::from_args(args)?;

    let handler = Handler::bootstrap(&config).await?;
    info!(
        tools = handler.schema_tool_count().await,
        "schema introspected"
    );

    match config.transport {
        Transport::StreamableHttp { address } => http::serve(handler, address).await?,
        Transport::Stdio => stdio::serve(handler).await?,
    }

    Ok(())
}
