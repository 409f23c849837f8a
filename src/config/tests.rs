use super::{apply_config, load_config_file, types::DurationValue};
use crate::args::{HttpMethod, LoadArgs, OutputFormat};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

fn parse_with_matches(argv: &[&str]) -> Result<(LoadArgs, clap::ArgMatches), String> {
    let matches = LoadArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = LoadArgs::from_arg_matches(&matches).map_err(|err| format!("{}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.toml");
    let content = r#"
url = "http://localhost:3000/health"
vus = 25
duration = "90s"
requests = 500
enforce_requests = true
method = "post"
headers = ["X-Env: staging", "Authorization: Bearer token"]
no_ui = true
output_format = "json"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.url.as_deref() != Some("http://localhost:3000/health") {
        return Err("Unexpected url".to_owned());
    }
    if config.vus != Some(25) || config.requests != Some(500) {
        return Err("Unexpected vus/requests".to_owned());
    }
    let duration = config
        .duration
        .as_ref()
        .ok_or("Expected duration")?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if duration != Duration::from_secs(90) {
        return Err(format!("Unexpected duration: {:?}", duration));
    }
    if config.output_format != Some(OutputFormat::Json) {
        return Err("Expected json output format".to_owned());
    }
    if config.headers.as_ref().map(Vec::len) != Some(2) {
        return Err("Expected two headers".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.json");
    let content = r#"{"url": "https://example.com", "vus": 4, "duration": 15, "method": "HEAD"}"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.vus != Some(4) || config.method.as_deref() != Some("HEAD") {
        return Err("Unexpected config values".to_owned());
    }
    match config.duration {
        Some(DurationValue::Seconds(15)) => Ok(()),
        other => Err(format!("Unexpected duration: {:?}", other)),
    }
}

#[test]
fn fractional_duration_in_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.json");
    std::fs::write(&path, r#"{"duration": 2.5}"#)
        .map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    let duration = config
        .duration
        .as_ref()
        .ok_or("Expected duration")?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if duration == Duration::from_millis(2_500) {
        Ok(())
    } else {
        Err(format!("Unexpected duration: {:?}", duration))
    }
}

#[test]
fn reject_unknown_extension() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.yaml");
    std::fs::write(&path, "url: x").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected unsupported extension error".to_owned());
    }
    Ok(())
}

#[test]
fn reject_unknown_keys() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.toml");
    std::fs::write(&path, "url = \"http://x\"\nrate = 5\n")
        .map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected unknown key to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn config_fills_missing_values() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.toml");
    std::fs::write(
        &path,
        "url = \"http://localhost:9000\"\nvus = 3\nduration = \"2m\"\nmethod = \"put\"\nheaders = [\"X-A: 1\"]\nno_banner = true\n",
    )
    .map_err(|err| format!("write failed: {}", err))?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    let (mut args, matches) = parse_with_matches(&["hyperload"])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://localhost:9000") {
        return Err("Expected url from config".to_owned());
    }
    if args.vus.map(|vus| vus.get()) != Some(3) {
        return Err("Expected vus from config".to_owned());
    }
    if args.duration != Some(Duration::from_secs(120)) {
        return Err("Expected duration from config".to_owned());
    }
    if args.method != HttpMethod::Put {
        return Err("Expected PUT from config".to_owned());
    }
    if args.headers != vec![("X-A".to_owned(), "1".to_owned())] {
        return Err(format!("Unexpected headers: {:?}", args.headers));
    }
    if !args.no_banner {
        return Err("Expected no_banner from config".to_owned());
    }
    Ok(())
}

#[test]
fn cli_values_override_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("hyperload.json");
    std::fs::write(
        &path,
        r#"{"url": "http://config", "vus": 50, "method": "delete", "headers": ["X-A: config"]}"#,
    )
    .map_err(|err| format!("write failed: {}", err))?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    let (mut args, matches) = parse_with_matches(&[
        "hyperload",
        "--url",
        "http://cli",
        "--vus",
        "2",
        "--method",
        "get",
        "-H",
        "X-B: cli",
    ])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://cli") {
        return Err("CLI url should win".to_owned());
    }
    if args.vus.map(|vus| vus.get()) != Some(2) {
        return Err("CLI vus should win".to_owned());
    }
    if args.method != HttpMethod::Get {
        return Err("CLI method should win".to_owned());
    }
    if args.headers != vec![("X-B".to_owned(), "cli".to_owned())] {
        return Err(format!("CLI headers should win: {:?}", args.headers));
    }
    Ok(())
}

#[test]
fn invalid_config_values_are_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let cases = [
        "vus = 0\n",
        "requests = 0\n",
        "duration = 0\n",
        "duration = \"5d\"\n",
        "method = \"TRACE\"\n",
        "headers = [\"NoColon\"]\n",
    ];
    for (idx, content) in cases.iter().enumerate() {
        let path = dir.path().join(format!("case{}.toml", idx));
        std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
        let config = load_config_file(&path).map_err(|err| err.to_string())?;
        let (mut args, matches) = parse_with_matches(&["hyperload"])?;
        if apply_config(&mut args, &matches, &config).is_ok() {
            return Err(format!("Expected '{}' to be rejected", content.trim()));
        }
    }
    Ok(())
}
