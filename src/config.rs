use std::time::Duration;
use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_MILLIS: u64 = 3000;
const DEFAULT_GET_ATTEMPTS: u32 = 3;

/// Settings read from the environment (after `.env` has been loaded).
///
/// | Variable                 | Default                     |
/// |--------------------------|-----------------------------|
/// | `SCOREBOOK_API_URL`      | `http://localhost:8080/api` |
/// | `SCOREBOOK_TIMEOUT_SECS` | `10`                        |
/// | `SCOREBOOK_RETRY_MILLIS` | `3000`                      |
/// | `SCOREBOOK_GET_ATTEMPTS` | `3`                         |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub retry_sleep: Duration,
    pub get_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_sleep: Duration::from_millis(DEFAULT_RETRY_MILLIS),
            get_attempts: DEFAULT_GET_ATTEMPTS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let api_url = lookup("SCOREBOOK_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);
        let timeout = match lookup("SCOREBOOK_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.trim().parse().with_context(|| format!("SCOREBOOK_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"))?),
            None => defaults.timeout,
        };
        let retry_sleep = match lookup("SCOREBOOK_RETRY_MILLIS") {
            Some(millis) => Duration::from_millis(millis.trim().parse().with_context(|| format!("SCOREBOOK_RETRY_MILLIS must be a whole number of milliseconds, got '{millis}'"))?),
            None => defaults.retry_sleep,
        };
        let get_attempts = match lookup("SCOREBOOK_GET_ATTEMPTS") {
            Some(attempts) => attempts.trim().parse::<u32>().with_context(|| format!("SCOREBOOK_GET_ATTEMPTS must be a whole number, got '{attempts}'"))?.max(1),
            None => defaults.get_attempts,
        };

        Ok(Self {
            api_url,
            timeout,
            retry_sleep,
            get_attempts,
        })
    }
}
