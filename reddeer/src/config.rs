//! Process-wide wait defaults.
//!
//! Set at most once, before tests start, and read from any thread afterwards.

use crate::errors::{RedDeerError, RedDeerResult};
use crate::wait::TimePeriod;
use once_cell::sync::OnceCell;
use std::env;
use std::time::Duration;
use tracing::info;

pub const WAIT_TIMEOUT_ENV: &str = "REDDEER_WAIT_TIMEOUT";
pub const POLL_INTERVAL_ENV: &str = "REDDEER_POLL_INTERVAL_MS";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

static WAIT_DEFAULTS: OnceCell<WaitDefaults> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitDefaults {
    pub timeout: TimePeriod,
    pub poll_interval: Duration,
}

impl Default for WaitDefaults {
    fn default() -> Self {
        Self {
            timeout: TimePeriod::DEFAULT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitDefaults {
    /// Built-in defaults overridden by `REDDEER_WAIT_TIMEOUT` (seconds) and
    /// `REDDEER_POLL_INTERVAL_MS` when they are set.
    pub fn from_env() -> RedDeerResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> RedDeerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut defaults = Self::default();
        if let Some(raw) = lookup(WAIT_TIMEOUT_ENV) {
            defaults.timeout = TimePeriod::seconds(parse_number(WAIT_TIMEOUT_ENV, &raw)?);
        }
        if let Some(raw) = lookup(POLL_INTERVAL_ENV) {
            defaults.poll_interval = Duration::from_millis(parse_number(POLL_INTERVAL_ENV, &raw)?);
        }
        Ok(defaults)
    }
}

fn parse_number(key: &str, raw: &str) -> RedDeerResult<u64> {
    raw.trim()
        .parse()
        .map_err(|e| RedDeerError::Config(format!("{key}={raw:?} is not a valid number: {e}")))
}

/// Stores the process-wide defaults. Fails if they were already set.
pub fn init(defaults: WaitDefaults) -> RedDeerResult<()> {
    WAIT_DEFAULTS
        .set(defaults)
        .map_err(|_| RedDeerError::Config("wait defaults are already initialized".to_string()))?;
    info!(
        timeout = %defaults.timeout,
        poll_interval = ?defaults.poll_interval,
        "wait defaults initialized"
    );
    Ok(())
}

/// The stored defaults, or the built-in ones when [`init`] was never called.
pub fn wait_defaults() -> WaitDefaults {
    WAIT_DEFAULTS.get().copied().unwrap_or_default()
}
