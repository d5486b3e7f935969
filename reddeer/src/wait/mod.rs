//! Polling waits on UI conditions.
//!
//! A wait moves `Idle -> Polling -> {Satisfied | TimedOut}`. The condition is
//! tested once immediately, then after every poll interval until it holds or
//! the timeout has elapsed. Waits cannot be cancelled from outside; the only
//! ways out are satisfaction, the timeout or a fatal error from the condition.

pub mod condition;
pub mod conditions;
pub mod time_period;

pub use condition::WaitCondition;
pub use conditions::{
    FnCondition, Not, ShellIsActive, ShellIsAvailable, WidgetIsFound, WidgetTextMatches,
};
pub use time_period::TimePeriod;

use crate::config;
use crate::errors::{RedDeerError, RedDeerResult};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Shortest pause between two polls.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Idle,
    Polling,
    Satisfied,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Until,
    While,
}

struct Poller<C> {
    condition: C,
    expect: Expect,
    timeout: Duration,
    poll_interval: Duration,
    raise_on_timeout: bool,
    state: WaitState,
}

impl<C: WaitCondition> Poller<C> {
    fn new(condition: C, expect: Expect) -> Self {
        let defaults = config::wait_defaults();
        Self {
            condition,
            expect,
            timeout: defaults.timeout.as_duration(),
            poll_interval: defaults.poll_interval,
            raise_on_timeout: true,
            state: WaitState::Idle,
        }
    }

    fn is_done(&mut self) -> bool {
        let holds = self.condition.test();
        match self.expect {
            Expect::Until => holds,
            Expect::While => !holds,
        }
    }

    fn run(&mut self) -> RedDeerResult<bool> {
        let start = Instant::now();
        self.state = WaitState::Polling;
        let poll_interval = self.poll_interval.max(MIN_POLL_INTERVAL);
        let mut polls = 0u32;
        loop {
            polls += 1;
            if self.is_done() {
                self.state = WaitState::Satisfied;
                debug!(polls, elapsed = ?start.elapsed(), "wait satisfied");
                return Ok(true);
            }
            if let Some(e) = self.condition.take_fatal_error() {
                self.state = WaitState::TimedOut;
                return Err(e);
            }
            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                break;
            }
            thread::sleep(poll_interval.min(self.timeout - elapsed));
        }

        self.state = WaitState::TimedOut;
        let detail = match self.expect {
            Expect::Until => self.condition.error_message_until(),
            Expect::While => self.condition.error_message_while(),
        };
        if !self.raise_on_timeout {
            debug!(polls, "wait timed out, returning false: {}", detail);
            return Ok(false);
        }
        Err(RedDeerError::WaitTimeoutExpired {
            timeout: self.timeout,
            description: self.condition.description(),
            detail,
        })
    }
}

macro_rules! wait_builder {
    ($name:ident, $expect:expr, $mode:literal, $doc:literal) => {
        #[doc = $doc]
        pub struct $name<C: WaitCondition> {
            poller: Poller<C>,
        }

        impl<C: WaitCondition> $name<C> {
            /// Wait with the process-wide default timeout and poll interval.
            pub fn new(condition: C) -> Self {
                Self {
                    poller: Poller::new(condition, $expect),
                }
            }

            pub fn timeout(mut self, timeout: impl Into<Duration>) -> Self {
                self.poller.timeout = timeout.into();
                self
            }

            /// Pause between two tests of the condition.
            pub fn poll_interval(mut self, interval: Duration) -> Self {
                self.poller.poll_interval = interval;
                self
            }

            /// Return `Ok(false)` on timeout instead of failing with
            /// [`RedDeerError::WaitTimeoutExpired`].
            pub fn suppress_timeout(mut self) -> Self {
                self.poller.raise_on_timeout = false;
                self
            }

            pub fn state(&self) -> WaitState {
                self.poller.state
            }

            pub fn condition(&self) -> &C {
                &self.poller.condition
            }

            pub fn into_condition(self) -> C {
                self.poller.condition
            }

            /// Blocks the calling thread until the wait ends. Returns `true`
            /// when the condition was met, `false` on a suppressed timeout.
            #[instrument(level = "debug", skip(self), fields(
                mode = $mode,
                condition = %self.poller.condition.description(),
                timeout = ?self.poller.timeout,
            ))]
            pub fn wait(&mut self) -> RedDeerResult<bool> {
                self.poller.run()
            }
        }
    };
}

wait_builder!(WaitUntil, Expect::Until, "until", "Blocks until a condition holds.");
wait_builder!(WaitWhile, Expect::While, "while", "Blocks while a condition holds.");
