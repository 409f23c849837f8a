use super::stub::{StubBehavior, StubServer};
use super::*;
use crate::args::{PositiveUsize, parse_target_url};
use crate::domain::RunConfig;
use crate::metrics::{ERROR_LABEL, OutcomeKind, TIMEOUT_LABEL};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn config_for(url: &str) -> Result<RunConfig, String> {
    let url = parse_target_url(url).map_err(|err| err.to_string())?;
    let vus = PositiveUsize::try_from(1).map_err(|err| err.to_string())?;
    Ok(RunConfig::new(url, vus, Duration::from_secs(1)))
}

fn executor_for(config: &RunConfig) -> Result<RequestExecutor, String> {
    RequestExecutor::new(config).map_err(|err| err.to_string())
}

fn ok_after(delay: Duration, status: u16) -> StubBehavior {
    StubBehavior::Respond { status, delay }
}

#[test]
fn status_200_is_success() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(ok_after(Duration::ZERO, 200)).await?;
        let executor = executor_for(&config_for(&server.url())?)?;

        let outcome = executor.execute().await;
        if outcome.kind != OutcomeKind::Success || outcome.status != Some(200) {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if outcome.label().to_string() != "200" {
            return Err(format!("Unexpected label: {}", outcome.label()));
        }
        Ok(())
    })
}

#[test]
fn not_modified_is_success() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(ok_after(Duration::ZERO, 304)).await?;
        let executor = executor_for(&config_for(&server.url())?)?;

        let outcome = executor.execute().await;
        if outcome.kind != OutcomeKind::Success || outcome.status != Some(304) {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        Ok(())
    })
}

#[test]
fn redirect_is_recorded_without_following() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(StubBehavior::Redirect {
            status: 302,
            location: "/next",
        })
        .await?;
        let executor = executor_for(&config_for(&server.url())?)?;

        let outcome = executor.execute().await;
        if outcome.kind != OutcomeKind::Success || outcome.status != Some(302) {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if outcome.label().to_string() != "302" {
            return Err(format!("Unexpected label: {}", outcome.label()));
        }
        let heads = server.request_heads();
        if heads.len() != 1 {
            return Err(format!("Expected one request cycle, saw {}", heads.len()));
        }
        Ok(())
    })
}

#[test]
fn status_404_is_http_error() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(ok_after(Duration::ZERO, 404)).await?;
        let executor = executor_for(&config_for(&server.url())?)?;

        let outcome = executor.execute().await;
        if outcome.kind != OutcomeKind::HttpError || outcome.status != Some(404) {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if outcome.label().to_string() != "404" {
            return Err(format!("Unexpected label: {}", outcome.label()));
        }
        Ok(())
    })
}

#[test]
fn connection_refused_is_transport_error() -> Result<(), String> {
    run_async_test(async {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr failed: {}", err))?;
        drop(listener);

        let executor = executor_for(&config_for(&format!("http://{}/", addr))?)?;
        let outcome = executor.execute().await;
        if outcome.kind != OutcomeKind::TransportError || outcome.status.is_some() {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if outcome.label().to_string() != ERROR_LABEL {
            return Err(format!("Unexpected label: {}", outcome.label()));
        }
        Ok(())
    })
}

#[test]
fn unanswered_request_times_out() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(StubBehavior::Hang).await?;
        let timeout = Duration::from_millis(200);
        let executor = executor_for(&config_for(&server.url())?)?.with_timeout(timeout);

        let outcome = executor.execute().await;
        if outcome.kind != OutcomeKind::Timeout {
            return Err(format!("Unexpected outcome: {:?}", outcome));
        }
        if outcome.label().to_string() != TIMEOUT_LABEL {
            return Err(format!("Unexpected label: {}", outcome.label()));
        }
        if outcome.latency < timeout {
            return Err(format!(
                "Timeout latency {:?} shorter than deadline",
                outcome.latency
            ));
        }
        Ok(())
    })
}

#[test]
fn latency_includes_server_delay() -> Result<(), String> {
    run_async_test(async {
        let delay = Duration::from_millis(50);
        let server = StubServer::spawn(ok_after(delay, 200)).await?;
        let executor = executor_for(&config_for(&server.url())?)?;

        let outcome = executor.execute().await;
        if outcome.latency < delay {
            return Err(format!("Latency {:?} below delay", outcome.latency));
        }
        Ok(())
    })
}

#[test]
fn default_user_agent_is_sent() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(ok_after(Duration::ZERO, 200)).await?;
        let executor = executor_for(&config_for(&server.url())?)?;
        let _outcome = executor.execute().await;

        let heads = server.request_heads();
        let head = heads.first().ok_or("Expected one request")?;
        if !head.contains("user-agent: hyperload/") {
            return Err(format!("Default User-Agent missing: {}", head));
        }
        Ok(())
    })
}

#[test]
fn custom_user_agent_overrides_default() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(ok_after(Duration::ZERO, 200)).await?;
        let mut config = config_for(&server.url())?;
        config
            .headers
            .insert("User-Agent".to_owned(), "custom-agent/1.0".to_owned());
        config
            .headers
            .insert("X-Run".to_owned(), "smoke".to_owned());
        let executor = executor_for(&config)?;
        let _outcome = executor.execute().await;

        let heads = server.request_heads();
        let head = heads.first().ok_or("Expected one request")?;
        if !head.contains("user-agent: custom-agent/1.0") {
            return Err(format!("Custom User-Agent missing: {}", head));
        }
        if head.contains("hyperload/") {
            return Err(format!("Default User-Agent still sent: {}", head));
        }
        if !head.contains("x-run: smoke") {
            return Err(format!("Custom header missing: {}", head));
        }
        Ok(())
    })
}

#[test]
fn method_is_sent_as_configured() -> Result<(), String> {
    run_async_test(async {
        let server = StubServer::spawn(ok_after(Duration::ZERO, 200)).await?;
        let mut config = config_for(&server.url())?;
        config.method = crate::args::HttpMethod::Delete;
        let executor = executor_for(&config)?;
        let _outcome = executor.execute().await;

        let heads = server.request_heads();
        let head = heads.first().ok_or("Expected one request")?;
        if !head.starts_with("delete / http/1.1") {
            return Err(format!("Unexpected request line: {}", head));
        }
        Ok(())
    })
}

#[test]
fn header_keys_differing_in_case_are_both_sent() -> Result<(), String> {
    let custom = BTreeMap::from([
        ("X-Id".to_owned(), "upper".to_owned()),
        ("x-id".to_owned(), "lower".to_owned()),
    ]);
    let headers = build_header_map(&custom).map_err(|err| err.to_string())?;
    let values: Vec<&str> = headers
        .get_all("x-id")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    if values != ["upper", "lower"] {
        return Err(format!("Unexpected values: {:?}", values));
    }
    if headers.get("user-agent").is_none() {
        return Err("Expected default User-Agent".to_owned());
    }
    Ok(())
}

#[test]
fn invalid_header_name_is_rejected() -> Result<(), String> {
    let custom = BTreeMap::from([("Bad Header".to_owned(), "value".to_owned())]);
    if build_header_map(&custom).is_ok() {
        return Err("Expected invalid header name to be rejected".to_owned());
    }
    Ok(())
}
