//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::LoadArgs;
pub use types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

pub(crate) use defaults::{DEFAULT_USER_AGENT, REQUEST_TIMEOUT};
pub(crate) use parsers::{parse_duration_arg, parse_duration_value, parse_header, parse_target_url};
