//! Runtime configuration: CLI flags, layered with an optional YAML file and environment
//! variables via `figment` (CLI wins, then env, then file).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::Parser;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::errors::ServerError;
use crate::headers::ForwardHeaders;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_DEPTH: usize = 5;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Command-line arguments. Field names mirror `FileConfig` so a YAML config can fill in anything
/// left unset on the CLI.
#[derive(Debug, Parser)]
#[command(styles = STYLES, about = "Expose a GraphQL endpoint's operations as MCP tools")]
pub struct Args {
    /// The GraphQL endpoint to introspect and forward operations to
    #[arg(long, short = 'e')]
    pub endpoint: Option<Url>,

    /// Optional YAML configuration file, layered under CLI args and environment variables
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Static header to send with every upstream request, as `name: value`; repeatable
    #[arg(long = "header", action = clap::ArgAction::Append)]
    pub headers: Vec<String>,

    /// Inbound header name to forward to the upstream request; repeatable
    #[arg(long = "passthru-header", action = clap::ArgAction::Append)]
    pub passthru_headers: Vec<String>,

    /// Regex pattern restricting which tools are registered; repeatable. When empty, all tools
    /// not excluded by `block` are registered
    #[arg(long = "allow", action = clap::ArgAction::Append)]
    pub allow_list: Vec<String>,

    /// Regex pattern excluding matching tools from registration; repeatable
    #[arg(long = "block", action = clap::ArgAction::Append)]
    pub block_list: Vec<String>,

    /// Per-request timeout, in seconds (default 30)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum selection-set recursion depth during operation synthesis (default 5)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Use the stdio transport instead of streamable HTTP
    #[arg(long)]
    pub stdio: bool,

    /// Address to bind the HTTP transport to
    #[arg(long, default_value = "127.0.0.1")]
    pub address: IpAddr,

    /// Port to bind the HTTP transport to
    #[arg(long, default_value_t = 5000)]
    pub port: u16,
}

/// Shape of the optional YAML config file; every field is optional so the file can fill in
/// whatever the CLI left unset.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    endpoint: Option<Url>,
    headers: Vec<String>,
    passthru_headers: Vec<String>,
    allow_list: Vec<String>,
    block_list: Vec<String>,
    timeout_secs: Option<u64>,
    max_depth: Option<usize>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub static_headers: HeaderMap,
    pub passthru_headers: ForwardHeaders,
    pub allow_list: Vec<String>,
    pub block_list: Vec<String>,
    pub timeout: Duration,
    pub max_depth: usize,
    pub transport: Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    StreamableHttp { address: SocketAddr },
    Stdio,
}

impl Config {
    /// Builds a `Config` from parsed CLI args, layering an optional YAML file (and environment
    /// variables prefixed `GRAPHQL_MCP_`) under whatever the CLI left unset.
    pub fn from_args(args: Args) -> Result<Self, ServerError> {
        let file: FileConfig = if let Some(path) = &args.config {
            Figment::new()
                .join(Env::prefixed("GRAPHQL_MCP_").split("__"))
                .join(Yaml::file(path))
                .extract()?
        } else {
            Figment::new()
                .join(Env::prefixed("GRAPHQL_MCP_").split("__"))
                .extract()?
        };

        let endpoint = args.endpoint.or(file.endpoint).ok_or(ServerError::MissingEndpoint)?;

        let header_strs = if args.headers.is_empty() { file.headers } else { args.headers };
        let static_headers = parse_static_headers(&header_strs)?;

        let passthru_headers = if args.passthru_headers.is_empty() {
            file.passthru_headers
        } else {
            args.passthru_headers
        };

        let allow_list = if args.allow_list.is_empty() { file.allow_list } else { args.allow_list };
        let block_list = if args.block_list.is_empty() { file.block_list } else { args.block_list };

        let timeout_secs = args.timeout_secs.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_depth = args.max_depth.or(file.max_depth).unwrap_or(DEFAULT_MAX_DEPTH);

        let transport = if args.stdio {
            Transport::Stdio
        } else {
            Transport::StreamableHttp {
                address: SocketAddr::new(args.address, args.port),
            }
        };

        Ok(Config {
            endpoint,
            static_headers,
            passthru_headers,
            allow_list,
            block_list,
            timeout: Duration::from_secs(timeout_secs),
            max_depth,
            transport,
        })
    }
}

fn parse_static_headers(entries: &[String]) -> Result<HeaderMap, ServerError> {
    let mut headers = HeaderMap::new();
    for entry in entries {
        let mut parts = entry.splitn(2, ':');
        let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
            return Err(ServerError::MalformedHeader(entry.clone()));
        };
        headers.append(
            HeaderName::from_str(name.trim())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}

impl Default for Transport {
    fn default() -> Self {
        Transport::StreamableHttp {
            address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            endpoint: Some(Url::parse("http://localhost:4000").unwrap()),
            config: None,
            headers: vec![],
            passthru_headers: vec![],
            allow_list: vec![],
            block_list: vec![],
            timeout_secs: None,
            max_depth: None,
            stdio: false,
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
        }
    }

    #[test]
    fn missing_endpoint_is_an_error() {
        let mut args = base_args();
        args.endpoint = None;
        let result = Config::from_args(args);
        assert!(result.is_err());
    }

    #[test]
    fn parses_static_headers_in_name_colon_value_form() {
        let mut args = base_args();
        args.headers = vec!["x-api-key: secret".to_string()];
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.static_headers.get("x-api-key").unwrap(), "secret");
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut args = base_args();
        args.headers = vec!["not-a-header-pair".to_string()];
        let result = Config::from_args(args);
        assert!(matches!(result, Err(ServerError::MalformedHeader(_))));
    }

    #[test]
    fn stdio_flag_selects_stdio_transport() {
        let mut args = base_args();
        args.stdio = true;
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.transport, Transport::Stdio);
    }

    #[test]
    fn default_transport_is_streamable_http_on_loopback() {
        let args = base_args();
        let config = Config::from_args(args).unwrap();
        assert_eq!(
            config.transport,
            Transport::StreamableHttp {
                address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000)
            }
        );
    }

    #[test]
    fn timeout_and_max_depth_fall_back_to_defaults() {
        let args = base_args();
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_depth, 5);
    }

    #[test]
    fn explicit_cli_timeout_and_max_depth_win_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                "endpoint: http://localhost:4000\ntimeout_secs: 99\nmax_depth: 9\n",
            )?;

            let mut args = base_args();
            args.config = Some(PathBuf::from("config.yaml"));
            args.timeout_secs = Some(5);
            args.max_depth = Some(2);

            let config = Config::from_args(args).unwrap();
            assert_eq!(config.timeout, Duration::from_secs(5));
            assert_eq!(config.max_depth, 2);
            Ok(())
        });
    }

    #[test]
    fn file_fills_in_timeout_and_max_depth_left_unset_on_cli() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                "endpoint: http://localhost:4000\ntimeout_secs: 99\nmax_depth: 9\n",
            )?;

            let mut args = base_args();
            args.config = Some(PathBuf::from("config.yaml"));

            let config = Config::from_args(args).unwrap();
            assert_eq!(config.timeout, Duration::from_secs(99));
            assert_eq!(config.max_depth, 9);
            Ok(())
        });
    }
}
