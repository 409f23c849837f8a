use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::throttle::Throttle;
use super::window::RunWindow;
use crate::http::RequestSender;
use crate::metrics::MetricsAggregator;

/// One logical actor issuing requests until the window closes.
pub(crate) struct VirtualUser {
    pub(crate) id: usize,
    pub(crate) sender: Arc<dyn RequestSender>,
    pub(crate) aggregator: Arc<MetricsAggregator>,
    pub(crate) window: Arc<RunWindow>,
    pub(crate) duration: Duration,
    pub(crate) request_cap: Option<u64>,
}

impl VirtualUser {
    /// Issues requests without waiting on earlier ones and returns how many
    /// were issued, once every one of them has been recorded.
    pub(crate) async fn run(self) -> u64 {
        let throttle = Throttle::new();
        let mut inflight: JoinSet<()> = JoinSet::new();
        let mut issued: u64 = 0;

        while self.window.is_running() && throttle.elapsed() < self.duration {
            if self.request_cap.is_some_and(|cap| issued >= cap) {
                debug!("Virtual user {} reached its request cap", self.id);
                break;
            }

            let sender = Arc::clone(&self.sender);
            let aggregator = Arc::clone(&self.aggregator);
            inflight.spawn(async move {
                let outcome = sender.send().await;
                aggregator.record(&outcome);
            });
            issued = issued.saturating_add(1);

            while let Some(joined) = inflight.try_join_next() {
                log_join_failure(self.id, joined);
            }
            throttle.pace(issued).await;
        }

        while let Some(joined) = inflight.join_next().await {
            log_join_failure(self.id, joined);
        }
        issued
    }
}

fn log_join_failure(user: usize, joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined
        && err.is_panic()
    {
        warn!("Request task of virtual user {} panicked: {}", user, err);
    }
}
