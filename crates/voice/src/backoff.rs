//! Randomized pacing for provider jobs.
//!
//! The provider rate-limits aggressively. Every status poll waits a jittered
//! poll delay, and consecutive submissions are spaced by a jittered job
//! window that includes the time already spent polling.

use std::time::Duration;

use rand::Rng;
use sitcom_common::{secs_to_duration, VoiceDefaults};

/// Delay and retry budget for synthesis jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Mean wait before each status poll.
    pub poll_delay: Duration,
    /// Poll delay is drawn from `poll_delay ± poll_jitter`.
    pub poll_jitter: Duration,
    /// Mean spacing between consecutive job submissions.
    pub job_delay: Duration,
    /// Job spacing is drawn from `job_delay ± job_jitter`.
    pub job_jitter: Duration,
    /// Polls allowed per job before it is declared timed out.
    pub max_poll_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_secs(10),
            poll_jitter: Duration::from_secs(1),
            job_delay: Duration::from_secs(30),
            job_jitter: Duration::from_secs(3),
            max_poll_attempts: 90,
        }
    }
}

impl BackoffPolicy {
    /// Policy from the `voice` section of the application config.
    pub fn from_defaults(defaults: &VoiceDefaults) -> Self {
        Self {
            poll_delay: secs_to_duration(defaults.poll_delay_secs),
            poll_jitter: secs_to_duration(defaults.poll_jitter_secs),
            job_delay: secs_to_duration(defaults.job_delay_secs),
            job_jitter: secs_to_duration(defaults.job_jitter_secs),
            max_poll_attempts: defaults.max_poll_attempts.max(1),
        }
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn with_job_delay(mut self, delay: Duration) -> Self {
        self.job_delay = delay;
        self
    }

    /// Wait before the next status poll.
    pub fn next_poll_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        jittered(self.poll_delay, self.poll_jitter, rng)
    }

    /// Spacing to keep between this job's submission and the next one.
    pub fn next_job_window<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        jittered(self.job_delay, self.job_jitter, rng)
    }
}

fn jittered<R: Rng + ?Sized>(mean: Duration, jitter: Duration, rng: &mut R) -> Duration {
    if jitter.is_zero() {
        return mean;
    }
    let mean = mean.as_secs_f64();
    let jitter = jitter.as_secs_f64();
    secs_to_duration(rng.gen_range(mean - jitter..=mean + jitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_policy() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.poll_delay, Duration::from_secs(10));
        assert_eq!(policy.job_delay, Duration::from_secs(30));
        assert_eq!(policy.max_poll_attempts, 90);
    }

    #[test]
    fn test_delays_stay_within_jitter_band() {
        let policy = BackoffPolicy::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let poll = policy.next_poll_delay(&mut rng);
            assert!(poll >= Duration::from_secs(9) && poll <= Duration::from_secs(11));
            let job = policy.next_job_window(&mut rng);
            assert!(job >= Duration::from_secs(27) && job <= Duration::from_secs(33));
        }
    }

    #[test]
    fn test_jitter_never_goes_negative() {
        let policy = BackoffPolicy {
            poll_delay: Duration::from_millis(100),
            poll_jitter: Duration::from_secs(5),
            ..BackoffPolicy::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(policy.next_poll_delay(&mut rng) <= Duration::from_millis(5100));
        }
    }

    #[test]
    fn test_from_defaults() {
        let defaults = VoiceDefaults {
            job_delay_secs: 5.0,
            job_jitter_secs: 0.0,
            max_poll_attempts: 0,
            ..VoiceDefaults::default()
        };
        let policy = BackoffPolicy::from_defaults(&defaults);
        assert_eq!(policy.job_delay, Duration::from_secs(5));
        assert!(policy.job_jitter.is_zero());
        assert_eq!(policy.max_poll_attempts, 1);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(policy.next_job_window(&mut rng), Duration::from_secs(5));
    }
}
