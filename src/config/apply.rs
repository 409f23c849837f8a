use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{HttpMethod, LoadArgs, PositiveU64, PositiveUsize, parse_header};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Fills every argument the user did not set explicitly from the config file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(args: &mut LoadArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_explicit(matches, "url")
        && let Some(url) = config.url.as_ref()
    {
        args.url = Some(url.clone());
    }

    if !is_explicit(matches, "vus")
        && let Some(vus) = config.vus
    {
        args.vus = Some(PositiveUsize::try_from(vus).map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "vus",
                source: err,
            })
        })?);
    }

    if !is_explicit(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = Some(
            duration
                .to_duration()
                .map_err(|err| AppError::config(ConfigError::InvalidDuration { source: err }))?,
        );
    }

    if !is_explicit(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = PositiveU64::try_from(requests).map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "requests",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "method")
        && let Some(method) = config.method.as_deref()
    {
        args.method = method
            .parse::<HttpMethod>()
            .map_err(|err| AppError::config(ConfigError::InvalidMethod { source: err }))?;
    }

    if !is_explicit(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header)
                    .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
            );
        }
        args.headers = parsed;
    }

    if !is_explicit(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    apply_flag(matches, "enforce_requests", config.enforce_requests, &mut args.enforce_requests);
    apply_flag(matches, "no_ui", config.no_ui, &mut args.no_ui);
    apply_flag(matches, "no_color", config.no_color, &mut args.no_color);
    apply_flag(matches, "no_banner", config.no_banner, &mut args.no_banner);

    Ok(())
}

fn apply_flag(matches: &ArgMatches, name: &str, value: Option<bool>, target: &mut bool) {
    if !is_explicit(matches, name)
        && let Some(value) = value
    {
        *target = value;
    }
}

/// Set on the command line or through an environment variable.
fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
