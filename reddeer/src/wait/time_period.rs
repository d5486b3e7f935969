use std::fmt;
use std::time::Duration;

/// Immutable span of time with seconds granularity, used as a wait timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePeriod(Duration);

impl TimePeriod {
    pub const NONE: TimePeriod = TimePeriod::seconds(0);
    pub const SHORT: TimePeriod = TimePeriod::seconds(1);
    pub const DEFAULT: TimePeriod = TimePeriod::seconds(10);
    pub const MEDIUM: TimePeriod = TimePeriod::seconds(20);
    pub const LONG: TimePeriod = TimePeriod::seconds(60);
    pub const VERY_LONG: TimePeriod = TimePeriod::seconds(180);

    pub const fn seconds(seconds: u64) -> Self {
        TimePeriod(Duration::from_secs(seconds))
    }

    pub const fn as_secs(self) -> u64 {
        self.0.as_secs()
    }

    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for TimePeriod {
    fn default() -> Self {
        TimePeriod::DEFAULT
    }
}

/// Sub-second parts are truncated.
impl From<Duration> for TimePeriod {
    fn from(duration: Duration) -> Self {
        TimePeriod::seconds(duration.as_secs())
    }
}

impl From<TimePeriod> for Duration {
    fn from(period: TimePeriod) -> Self {
        period.0
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.as_secs())
    }
}
