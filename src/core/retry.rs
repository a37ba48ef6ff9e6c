use std::fmt::Display;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Delay schedule between attempts of an external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffPolicy {
    None,
    Fixed(Duration),
    /// `attempt × base`: 5s, 10s, 15s, …
    Linear(Duration),
    /// `base × factor^(attempt-1)`: 50ms, 200ms, 800ms for factor 4.
    Exponential { base: Duration, factor: u32 },
}

impl BackoffPolicy {
    /// Delay after the `attempt`-th failure (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffPolicy::None => Duration::ZERO,
            BackoffPolicy::Fixed(base) => *base,
            BackoffPolicy::Linear(base) => base.saturating_mul(attempt),
            BackoffPolicy::Exponential { base, factor } => {
                base.saturating_mul(factor.saturating_pow(attempt.saturating_sub(1)))
            }
        }
    }
}

/// Runs `op` up to `max_attempts` times, sleeping per `policy` between
/// failures. The pure transforms never call this; it exists for the
/// orchestration layer to wrap OCR and chat calls.
pub fn with_retry<T, E, F>(max_attempts: u32, policy: BackoffPolicy, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                let delay = policy.delay(attempt);
                warn!(attempt, max_attempts, error = %err, "attempt failed, retrying");
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            Err(err) => return Err(err),
        }
    }
}
