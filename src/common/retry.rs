//! Bounded retry for transport-level failures
//!
//! The default policy is the exchange client's long-standing behaviour:
//! ten attempts with a fixed five second pause and no jitter. Exponential
//! growth and jitter are opt-in.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use bittrex_client::common::{Backoff, RetryPolicy};
//!
//! let policy = RetryPolicy::default()
//!     .with_max_attempts(4)
//!     .with_base_delay(Duration::from_millis(500))
//!     .with_backoff(Backoff::Exponential);
//!
//! assert_eq!(policy.delay_for(1), Duration::from_millis(500));
//! assert_eq!(policy.delay_for(3), Duration::from_secs(2));
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::thread::sleep;
use std::time::Duration;
use tracing::{error, warn};

use crate::error::{Error, Result, TransportError};

/// Total attempts on a failing connection
pub const CONNECT_RETRIES: u32 = 10;

/// Pause between failed connection attempts
pub const CONNECT_WAIT: Duration = Duration::from_secs(5);

/// Upper bound for a single exponential pause
pub const MAX_DELAY: Duration = Duration::from_secs(300);

/// How the pause grows between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    #[default]
    Fixed,
    Exponential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per call, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
    /// Randomise each pause within its upper half
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: CONNECT_RETRIES,
            base_delay: CONNECT_WAIT,
            backoff: Backoff::Fixed,
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no pauses
    pub fn none() -> Self {
        Self::default().with_max_attempts(1)
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Attempt cap, never below one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pause after the `failed`-th consecutive failure (1-based), before jitter
    pub fn delay_for(&self, failed: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let exponent = failed.saturating_sub(1).min(31);
                self.base_delay
                    .checked_mul(1u32 << exponent)
                    .unwrap_or(MAX_DELAY)
                    .min(MAX_DELAY)
            }
        }
    }

    fn pause(&self, failed: u32) -> Duration {
        let delay = self.delay_for(failed);
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let half = delay / 2;
        let spread = (delay - half).as_millis() as u64;
        half + Duration::from_millis(rand::thread_rng().gen_range(0..=spread))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error, or
    /// the attempt cap is reached. The closure receives the 1-based attempt
    /// number. No pause follows the final attempt.
    pub fn run<T, F>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> std::result::Result<T, TransportError>,
    {
        let max_attempts = self.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let pause = self.pause(attempt);
                    warn!(
                        "Request failed (attempt {}/{}): {}; retrying in {}ms",
                        attempt,
                        max_attempts,
                        e,
                        pause.as_millis()
                    );
                    if !pause.is_zero() {
                        sleep(pause);
                    }
                }
                Err(e) => {
                    error!("Request failed after {} attempt(s): {}", attempt, e);
                    return Err(Error::Transport {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }
}
