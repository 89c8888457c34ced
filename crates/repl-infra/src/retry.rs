//! Exponential backoff retry, per `spec.md` §4.7/§4.8.
//!
//! Backoff parameters live on the call site (the Executor's Connect
//! phase), not behind a global — per the teacher's guidance in `spec.md`
//! §9 about replacing `setTimeout`-based retry with a monotonic-clock
//! sleep owned by the caller.

use std::thread::sleep;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub base_ms: u64,
    pub factor: u32,
    pub cap_ms: u64,
    pub attempts: u32,
}

impl Backoff {
    /// The connect-step defaults named in `spec.md` §4.7: 1000ms base,
    /// factor 2, 10000ms cap, 3 attempts.
    pub const CONNECT: Backoff = Backoff { base_ms: 1_000, factor: 2, cap_ms: 10_000, attempts: 3 };

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scaled = self.base_ms.saturating_mul(self.factor.saturating_pow(attempt) as u64);
        Duration::from_millis(scaled.min(self.cap_ms))
    }
}

/// Calls `f` up to `backoff.attempts` times, sleeping the computed delay
/// between attempts. Returns the last error if every attempt fails.
/// `sleep` is the only suspension point inside the loop, per §5.
pub fn retry_with_backoff<T, E>(backoff: Backoff, mut f: impl FnMut(u32) -> Result<T, E>) -> Result<T, E> {
    let mut last_err = None;
    for attempt in 0..backoff.attempts {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                last_err = Some(e);
                if attempt + 1 < backoff.attempts {
                    sleep(backoff.delay_for_attempt(attempt));
                }
            }
        }
    }
    Err(last_err.expect("attempts is always >= 1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn delay_grows_exponentially_then_caps() {
        let b = Backoff { base_ms: 1_000, factor: 2, cap_ms: 10_000, attempts: 5 };
        assert_eq!(b.delay_for_attempt(0), Duration::from_millis(1_000));
        assert_eq!(b.delay_for_attempt(1), Duration::from_millis(2_000));
        assert_eq!(b.delay_for_attempt(2), Duration::from_millis(4_000));
        assert_eq!(b.delay_for_attempt(10), Duration::from_millis(10_000));
    }

    #[test]
    fn retry_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let backoff = Backoff { base_ms: 1, factor: 2, cap_ms: 2, attempts: 3 };
        let result: Result<&str, &str> = retry_with_backoff(backoff, |attempt| {
            calls.set(calls.get() + 1);
            if attempt < 2 {
                Err("transient")
            } else {
                Ok("ok")
            }
        });
        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn retry_returns_last_error_when_exhausted() {
        let backoff = Backoff { base_ms: 1, factor: 2, cap_ms: 2, attempts: 2 };
        let result: Result<(), &str> = retry_with_backoff(backoff, |_| Err("nope"));
        assert_eq!(result, Err("nope"));
    }
}
