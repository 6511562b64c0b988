use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

use crate::config::RecorderConfig;
use crate::fetch;
use crate::models::PollResult;
use crate::utils;

/// Which durable log a poll outcome lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Empty,
    NonEmpty,
}

/// Recorder pipeline: append one line per poll, bucketed by payload shape.
/// Holds no transition state; every cycle is logged unconditionally.
pub struct Recorder {
    config: RecorderConfig,
    http_client: reqwest::Client,
}

impl Recorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self { config, http_client: reqwest::Client::new() }
    }

    pub async fn run(self) -> Result<()> {
        info!(
            "Recording {} every {}s (±{}s)",
            self.config.endpoint_url,
            self.config.base_interval.as_secs(),
            self.config.jitter_spread.as_secs()
        );

        loop {
            let result = fetch::fetch(&self.http_client, &self.config.endpoint_url).await;
            self.record(Utc::now(), &result);

            let delay = utils::jitter_additive(self.config.base_interval, self.config.jitter_spread);
            debug!("Sleeping for {:.2}s", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }

    /// A failed append is logged and skipped; the next cycle opens the file
    /// fresh and tries again.
    fn record(&self, timestamp: DateTime<Utc>, result: &PollResult) {
        let (entry, bucket) = build_entry(timestamp, result);
        let path = match bucket {
            Bucket::Empty => &self.config.empty_log,
            Bucket::NonEmpty => &self.config.non_empty_log,
        };
        if let Err(e) = append_line(path, &entry) {
            error!("Could not append to {}: {}", path.display(), e);
        }
    }
}

/// One line in the durable format:
/// `<timestamp> - Status code: <code> - Payload: <payload>` for completed
/// requests, `<timestamp> - Request failed: <reason>` for transport
/// failures (which carry no status code and always land in the non-empty
/// log).
pub fn build_entry(timestamp: DateTime<Utc>, result: &PollResult) -> (String, Bucket) {
    let stamp = timestamp.format("%Y-%m-%dT%H:%M:%S%.6f");
    match result {
        PollResult::Success { status_code, payload } => (
            format!("{} - Status code: {} - Payload: {}", stamp, status_code, payload.render()),
            Bucket::NonEmpty,
        ),
        PollResult::Empty { status_code, payload } => (
            format!("{} - Status code: {} - Payload: {}", stamp, status_code, payload.render()),
            Bucket::Empty,
        ),
        PollResult::TransportError { reason } => (
            format!("{} - Request failed: {}", stamp, reason),
            Bucket::NonEmpty,
        ),
    }
}

/// Opened in append mode per write rather than held across cycles; the
/// line is on disk before the next sleep starts.
fn append_line(path: &Path, entry: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Payload;
    use chrono::TimeZone;
    use serde_json::json;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn populated_payload_routes_to_the_non_empty_log() {
        let result = PollResult::Success {
            status_code: 200,
            payload: Payload::Structured(json!({"a": 1})),
        };
        let (entry, bucket) = build_entry(at_noon(), &result);
        assert_eq!(bucket, Bucket::NonEmpty);
        assert_eq!(
            entry,
            r#"2025-03-01T12:00:00.000000 - Status code: 200 - Payload: {"a":1}"#
        );
    }

    #[test]
    fn empty_payload_routes_to_the_empty_log() {
        let result = PollResult::Empty {
            status_code: 200,
            payload: Payload::Structured(json!([])),
        };
        let (entry, bucket) = build_entry(at_noon(), &result);
        assert_eq!(bucket, Bucket::Empty);
        assert_eq!(entry, "2025-03-01T12:00:00.000000 - Status code: 200 - Payload: []");
    }

    #[test]
    fn transport_failure_logs_without_a_status_code() {
        let result = PollResult::TransportError { reason: "connection refused".into() };
        let (entry, bucket) = build_entry(at_noon(), &result);
        assert_eq!(bucket, Bucket::NonEmpty);
        assert_eq!(entry, "2025-03-01T12:00:00.000000 - Request failed: connection refused");
    }

    #[test]
    fn text_payload_is_logged_verbatim() {
        let result = PollResult::Success {
            status_code: 200,
            payload: Payload::Text("<html>busy</html>".into()),
        };
        let (entry, _) = build_entry(at_noon(), &result);
        assert!(entry.ends_with("Payload: <html>busy</html>"));
    }

    #[test]
    fn append_line_creates_and_extends_the_file() {
        let path = std::env::temp_dir().join(format!("slotwatch-append-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        append_line(&path, "first").unwrap();
        append_line(&path, "second").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");

        std::fs::remove_file(&path).unwrap();
    }
}
