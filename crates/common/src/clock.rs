//! Clock and sleep abstraction for paced, polled work.
//!
//! The voice orchestrator never calls `tokio::time::sleep` directly. It reads
//! elapsed time and waits through a [`Clock`], so production code runs on the
//! tokio timer while tests drive a [`ManualClock`] that advances instantly.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic time source that can also suspend the caller.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch.
    fn elapsed(&self) -> Duration;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real clock anchored to the moment it was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    /// The instant the clock was started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl SystemClock {
    /// Create a clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at clock start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

#[async_trait::async_trait]
impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Virtual clock for tests: `sleep` returns immediately and advances time.
///
/// Every requested sleep is recorded so pacing decisions can be asserted.
#[derive(Debug, Default)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without recording a sleep (simulates work).
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.now += by;
    }

    /// All sleeps requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.sleeps.clone()
    }

    /// Sum of all requested sleeps.
    pub fn total_slept(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait::async_trait]
impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.now += duration;
        state.sleeps.push(duration);
    }
}

/// Convert fractional seconds to a `Duration`, clamping negatives to zero.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_elapsed() {
        let clock = SystemClock::start();
        assert!(clock.elapsed() < Duration::from_secs(1));
        assert!(!clock.epoch_wall().is_empty());
    }

    #[tokio::test]
    async fn test_manual_clock_records_sleeps() {
        let clock = ManualClock::new();
        clock.sleep(Duration::from_secs(3)).await;
        clock.advance(Duration::from_millis(500));
        clock.sleep(Duration::from_secs(1)).await;

        assert_eq!(clock.elapsed(), Duration::from_millis(4500));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(3), Duration::from_secs(1)]
        );
        assert_eq!(clock.total_slept(), Duration::from_secs(4));
    }

    #[test]
    fn test_secs_to_duration_clamps() {
        assert_eq!(secs_to_duration(-2.0), Duration::ZERO);
        assert_eq!(secs_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(secs_to_duration(1.5), Duration::from_millis(1500));
    }
}
