use std::ffi::OsString;
use std::time::Duration;

use super::{build_run_config, parse_args};
use crate::args::HttpMethod;
use crate::error::{AppError, AppResult, ValidationError};

fn argv(args: &[&str]) -> Vec<OsString> {
    std::iter::once("hyperload")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

fn parse(args: &[&str]) -> AppResult<crate::args::LoadArgs> {
    parse_args(argv(args))
        .map(|(parsed, _)| parsed)
        .map_err(AppError::from)
}

#[test]
fn builds_run_config_from_flags() -> AppResult<()> {
    let args = parse(&[
        "--url",
        "https://example.com/items",
        "--vus",
        "3",
        "--duration",
        "1500ms",
        "-X",
        "patch",
        "-r",
        "7",
        "--enforce-requests",
        "-H",
        "X-Id: 1",
        "-H",
        "X-Id: 2",
        "-H",
        "x-id: 3",
    ])?;
    let config = build_run_config(&args)?;

    if config.url.as_str() != "https://example.com/items"
        || config.vus.get() != 3
        || config.duration != Duration::from_millis(1_500)
        || config.method != HttpMethod::Patch
        || config.request_cap() != Some(7)
    {
        return Err(AppError::validation(format!(
            "Unexpected run config {:?}",
            config
        )));
    }
    let headers: Vec<(&str, &str)> = config
        .headers
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    if headers == [("X-Id", "2"), ("x-id", "3")] {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Later duplicates should overwrite, got {:?}",
            headers
        )))
    }
}

#[test]
fn missing_parameters_are_named() -> AppResult<()> {
    let cases: [(&[&str], &str); 3] = [
        (&["--vus", "1", "--duration", "1"], "--url"),
        (&["--url", "http://localhost", "--duration", "1"], "--vus"),
        (&["--url", "http://localhost", "--vus", "1"], "--duration"),
    ];
    for (args, expected) in cases {
        let parsed = parse(args)?;
        match build_run_config(&parsed) {
            Err(AppError::Validation(ValidationError::MissingParameter { name }))
                if name == expected => {}
            other => {
                return Err(AppError::validation(format!(
                    "Expected missing {}, got {:?}",
                    expected, other
                )));
            }
        }
    }
    Ok(())
}

#[test]
fn rejects_url_without_http_scheme() -> AppResult<()> {
    let args = parse(&["--url", "ftp://example.com", "--vus", "1", "--duration", "1"])?;
    match build_run_config(&args) {
        Err(AppError::Validation(ValidationError::UrlSchemeUnsupported { .. })) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected scheme error, got {:?}",
            other
        ))),
    }
}

#[test]
fn help_and_version_map_to_success() -> AppResult<()> {
    for flag in ["--help", "-h", "--version", "-V"] {
        match parse_args(argv(&[flag])) {
            Err(err) if err.exit_code() == 0 => {}
            other => {
                return Err(AppError::validation(format!(
                    "Expected {} to exit 0, got {:?}",
                    flag,
                    other.map(|_| ())
                )));
            }
        }
    }
    Ok(())
}

#[test]
fn unknown_flag_maps_to_failure() -> AppResult<()> {
    match parse_args(argv(&["--bogus"])) {
        Err(err) if err.exit_code() != 0 => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected usage error, got {:?}",
            other.map(|_| ())
        ))),
    }
}
