use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Method, Response, header::HeaderMap, redirect};
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

use super::headers::build_header_map;
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::RequestOutcome;

/// Issues one request and reports how it went. Never fails.
#[async_trait]
pub trait RequestSender: Send + Sync {
    async fn send(&self) -> RequestOutcome;
}

/// Shared client plus everything needed to rebuild the same request.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
    timeout: Duration,
}

impl RequestExecutor {
    /// Builds the pooled client used by every virtual user. Redirects are
    /// not followed, so a 3xx is the outcome of its own cycle.
    ///
    /// # Errors
    ///
    /// Returns an error when a header is invalid or the client cannot be built.
    pub fn new(config: &RunConfig) -> AppResult<Self> {
        let headers = build_header_map(&config.headers)?;
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self {
            client,
            method: config.method.to_reqwest(),
            url: config.url.clone(),
            headers,
            timeout: config.request_timeout,
        })
    }

    /// Replaces the per-request deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Performs exactly one request/response cycle.
    ///
    /// The latency covers sending, the status line and the full body. When
    /// the deadline expires the in-flight future is dropped, which closes the
    /// connection.
    pub async fn execute(&self) -> RequestOutcome {
        let start = Instant::now();
        let request = self
            .client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone())
            .send();

        let result = tokio::time::timeout(self.timeout, async {
            let response = request.await?;
            let status = response.status().as_u16();
            drain_response_body(response).await?;
            Ok::<u16, reqwest::Error>(status)
        })
        .await;
        let latency = start.elapsed();

        let outcome = match result {
            Ok(Ok(status)) => RequestOutcome::from_status(status, latency),
            Ok(Err(err)) => {
                debug!("Request failed: {}", err);
                RequestOutcome::transport_error(latency)
            }
            Err(_elapsed) => RequestOutcome::timeout(latency),
        };
        trace!(
            "Request finished: {} ({}) in {:?}",
            outcome.kind.as_str(),
            outcome.label(),
            latency
        );
        outcome
    }
}

#[async_trait]
impl RequestSender for RequestExecutor {
    async fn send(&self) -> RequestOutcome {
        self.execute().await
    }
}

/// Reads the body to the end without buffering it.
async fn drain_response_body(response: Response) -> Result<(), reqwest::Error> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        chunk?;
    }
    Ok(())
}
