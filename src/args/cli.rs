use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize};
use super::types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "hyperload",
    version,
    about = "Async HTTP load generator - concurrent virtual users, live dashboard, and nearest-rank latency reports.",
    next_help_heading = "Output Options"
)]
pub struct LoadArgs {
    /// Target URL (http:// or https://)
    #[arg(long, short, help_heading = "Required")]
    pub url: Option<String>,

    /// Number of concurrent virtual users
    #[arg(long, value_parser = parse_positive_usize, help_heading = "Required")]
    pub vus: Option<PositiveUsize>,

    /// Test duration (seconds, or with ms/s/m/h suffix)
    #[arg(long, short, value_parser = parse_duration_arg, help_heading = "Required")]
    pub duration: Option<Duration>,

    /// Requests per virtual user (advisory unless --enforce-requests is set)
    #[arg(
        long,
        short,
        default_value = "100",
        value_parser = parse_positive_u64,
        help_heading = "Load Options"
    )]
    pub requests: PositiveU64,

    /// Stop each virtual user once it has issued --requests requests
    #[arg(long = "enforce-requests", help_heading = "Load Options")]
    pub enforce_requests: bool,

    /// HTTP method
    #[arg(
        long,
        short = 'X',
        default_value = "get",
        ignore_case = true,
        help_heading = "Load Options"
    )]
    pub method: HttpMethod,

    /// Custom header in 'Key: Value' format (repeatable; later keys overwrite earlier ones)
    #[arg(long = "header", short = 'H', value_parser = parse_header, help_heading = "Load Options")]
    pub headers: Vec<(String, String)>,

    /// Path to config file (TOML/JSON). Defaults to ./hyperload.toml or ./hyperload.json if present.
    #[arg(long, help_heading = "Load Options")]
    pub config: Option<String>,

    /// Report format printed after the run
    #[arg(long = "output-format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Disable the full-screen dashboard
    #[arg(long = "no-ui", alias = "no-tui")]
    pub no_ui: bool,

    /// Skip the run header printed before the test starts
    #[arg(long = "no-banner")]
    pub no_banner: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable verbose logging (debug level unless overridden by HYPERLOAD_LOG/RUST_LOG)
    #[arg(long, alias = "debug")]
    pub verbose: bool,
}
