use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::{RunOptions, run_load};
use crate::args::{LoadArgs, parse_target_url};
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, ValidationError};

#[cfg(test)]
mod tests;

/// Process entry point: parse, merge config, validate, run, map to an exit code.
#[must_use]
pub fn run() -> ExitCode {
    run_from(std::env::args_os())
}

pub(crate) fn run_from<I>(raw_args: I) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
{
    let (args, matches) = match parse_args(raw_args) {
        Ok(parsed) => parsed,
        Err(err) => return clap_exit(&err),
    };

    match execute(args, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if err.is_configuration() {
                eprintln!("Run with --help for usage.");
            }
            ExitCode::FAILURE
        }
    }
}

fn parse_args<I>(raw_args: I) -> Result<(LoadArgs, ArgMatches), clap::Error>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = LoadArgs::command().try_get_matches_from(raw_args)?;
    let args = LoadArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

/// Help and version exit 0; every other clap error exits 1.
fn clap_exit(err: &clap::Error) -> ExitCode {
    if let Err(print_err) = err.print() {
        eprintln!("Failed to print CLI message: {}", print_err);
    }
    if err.exit_code() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn execute(mut args: LoadArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(file) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &file)?;
    }
    let config = build_run_config(&args)?;

    let dashboard = !args.no_ui && std::io::stdout().is_terminal();
    crate::logger::init_logging(args.verbose, args.no_color, dashboard);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    let options = RunOptions {
        dashboard,
        no_color: args.no_color,
        no_banner: args.no_banner,
        output_format: args.output_format,
    };
    runtime.block_on(run_load(config, options))?;
    Ok(())
}

/// Validates merged arguments into an immutable run description.
///
/// # Errors
///
/// Returns an error when `--url`, `--vus` or `--duration` is missing, or the
/// URL is not an absolute http(s) URL with a host.
pub(crate) fn build_run_config(args: &LoadArgs) -> AppResult<RunConfig> {
    let raw_url = args
        .url
        .as_deref()
        .ok_or(ValidationError::MissingParameter { name: "--url" })?;
    let url = parse_target_url(raw_url)?;
    let vus = args
        .vus
        .ok_or(ValidationError::MissingParameter { name: "--vus" })?;
    let duration = args
        .duration
        .ok_or(ValidationError::MissingParameter { name: "--duration" })?;

    let mut config = RunConfig::new(url, vus, duration);
    config.method = args.method;
    config.requests_per_user = args.requests;
    config.enforce_requests = args.enforce_requests;
    config.headers = args
        .headers
        .iter()
        .cloned()
        .collect::<BTreeMap<String, String>>();
    Ok(config)
}
