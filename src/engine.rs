use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::WatcherConfig;
use crate::fetch;
use crate::models::{NotificationEvent, PollResult};
use crate::notify::Mailer;
use crate::utils;

/// One bit of state: was the endpoint available as of the last completed
/// poll. Fires on the rising edge only.
#[derive(Debug, Default)]
pub struct AvailabilityDetector {
    last_available: bool,
}

impl AvailabilityDetector {
    pub fn new() -> Self {
        Self { last_available: false }
    }

    /// Feeds one poll outcome through the transition function. Returns true
    /// exactly when this poll moves the state from unavailable to
    /// available; `Empty` and `TransportError` both count as unavailable.
    ///
    /// The state update is unconditional and happens before any delivery is
    /// attempted, so a failed email cannot re-arm the same edge.
    pub fn observe(&mut self, result: &PollResult) -> bool {
        let available = matches!(result, PollResult::Success { .. });
        let rising_edge = available && !self.last_available;
        self.last_available = available;
        rising_edge
    }
}

/// Watcher pipeline: poll, detect the rising edge, mail the operator.
pub struct Watcher {
    config: WatcherConfig,
    http_client: reqwest::Client,
    mailer: Mailer,
    detector: AvailabilityDetector,
}

impl Watcher {
    pub fn new(config: WatcherConfig) -> Result<Self> {
        let mailer = Mailer::new(&config.smtp)?;
        Ok(Self {
            config,
            http_client: reqwest::Client::new(),
            mailer,
            detector: AvailabilityDetector::new(),
        })
    }

    pub async fn run(mut self) -> Result<()> {
        info!(
            "Watching {} every {}s (±{:.0}%)",
            self.config.endpoint_url,
            self.config.base_interval.as_secs(),
            self.config.jitter_fraction * 100.0
        );

        loop {
            let result = fetch::fetch(&self.http_client, &self.config.endpoint_url).await;

            if self.detector.observe(&result) {
                if let PollResult::Success { payload, .. } = &result {
                    let event = NotificationEvent {
                        subject: self.config.subject.clone(),
                        body: format!(
                            "Appointment now available at {}:\n\n{}",
                            self.config.endpoint_url,
                            payload.render()
                        ),
                    };
                    if self.mailer.notify(&event).await {
                        info!("Rising edge notified");
                    }
                }
            }

            match &result {
                PollResult::Success { .. } => info!("Slot available"),
                PollResult::Empty { .. } => info!("No slot available"),
                PollResult::TransportError { reason } => warn!("Poll failed: {}", reason),
            }

            let delay = utils::jitter_multiplicative(self.config.base_interval, self.config.jitter_fraction);
            debug!("Sleeping for {:.2}s", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }
}
