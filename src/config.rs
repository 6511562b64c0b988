use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Fully resolved runtime configuration. Each pipeline is enabled by the
/// presence of its endpoint variable; configuring neither is fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub watcher: Option<WatcherConfig>,
    pub recorder: Option<RecorderConfig>,
}

/// Watcher pipeline: poll an endpoint and mail the operator on the
/// unavailable-to-available edge.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub endpoint_url: String,
    pub smtp: SmtpConfig,
    pub subject: String,
    pub base_interval: Duration,
    pub jitter_fraction: f64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub recipient: String,
}

/// Recorder pipeline: poll an endpoint and append every response to a
/// per-bucket log file.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub endpoint_url: String,
    pub base_interval: Duration,
    pub jitter_spread: Duration,
    pub empty_log: PathBuf,
    pub non_empty_log: PathBuf,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

fn default_subject() -> String {
    "Appointment available".into()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let watcher = match optional("ENDPOINT_URL") {
            Some(endpoint_url) => Some(WatcherConfig {
                endpoint_url,
                smtp: SmtpConfig {
                    host: optional("SMTP_HOST").unwrap_or_else(default_smtp_host),
                    user: required("SMTP_USER")?,
                    password: required("SMTP_PASSWORD")?,
                    recipient: required("RECIPIENT_EMAIL")?,
                },
                subject: optional("NOTIFY_SUBJECT").unwrap_or_else(default_subject),
                base_interval: Duration::from_secs(parsed_secs("POLL_INTERVAL", 60)?),
                jitter_fraction: 0.1,
            }),
            None => None,
        };

        let recorder = match optional("RECORD_URL") {
            Some(endpoint_url) => Some(RecorderConfig {
                endpoint_url,
                base_interval: Duration::from_secs(parsed_secs("RECORD_INTERVAL", 600)?),
                jitter_spread: Duration::from_secs(parsed_secs("RECORD_JITTER", 120)?),
                empty_log: optional("EMPTY_LOG")
                    .unwrap_or_else(|| "empty_responses.log".into())
                    .into(),
                non_empty_log: optional("NON_EMPTY_LOG")
                    .unwrap_or_else(|| "non_empty_responses.log".into())
                    .into(),
            }),
            None => None,
        };

        if watcher.is_none() && recorder.is_none() {
            bail!("No pipeline configured: set ENDPOINT_URL and/or RECORD_URL");
        }

        Ok(Self { watcher, recorder })
    }
}

/// Unset and empty are both treated as absent.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn required(name: &str) -> Result<String> {
    optional(name).with_context(|| format!("Required environment variable {} is not set", name))
}

fn parsed_secs(name: &str, default: u64) -> Result<u64> {
    match optional(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds (got {:?})", name, raw)),
        None => Ok(default),
    }
}
