//! Poll interval schedule.

use std::time::Duration;

use switchyard_config::DispatchConfig;

/// Poll schedule for asynchronous jobs.
///
/// The interval starts at `initial_interval`, grows by `backoff` after every
/// poll and never exceeds `max_interval`.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub backoff: f64,
    /// Budget used when the caller does not pass a timeout.
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(2_000),
            max_interval: Duration::from_millis(10_000),
            backoff: 1.5,
            timeout: Duration::from_millis(300_000),
        }
    }
}

impl PollSettings {
    /// Interval to use after sleeping for `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let backoff = if self.backoff.is_finite() && self.backoff >= 1.0 {
            self.backoff
        } else {
            1.0
        };
        current.mul_f64(backoff).min(self.max_interval)
    }

    /// The sequence of intervals a job polled for `count` rounds would sleep.
    pub fn schedule(&self, count: usize) -> Vec<Duration> {
        let mut intervals = Vec::with_capacity(count);
        let mut current = self.initial_interval.min(self.max_interval);
        for _ in 0..count {
            intervals.push(current);
            current = self.next_interval(current);
        }
        intervals
    }
}

impl From<&DispatchConfig> for PollSettings {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(config.poll_interval_ms),
            max_interval: Duration::from_millis(config.max_poll_interval_ms),
            backoff: config.poll_backoff,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = PollSettings::default().schedule(6);
        let millis: Vec<u128> = schedule.iter().map(|d| d.as_millis()).collect();
        assert_eq!(millis, vec![2000, 3000, 4500, 6750, 10000, 10000]);
    }

    #[test]
    fn test_interval_monotonic_and_capped() {
        let settings = PollSettings::default();
        let schedule = settings.schedule(50);
        for pair in schedule.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!(schedule.iter().all(|d| *d <= Duration::from_millis(10_000)));
    }

    #[test]
    fn test_shrinking_backoff_is_ignored() {
        let settings = PollSettings {
            backoff: 0.5,
            ..Default::default()
        };
        assert_eq!(
            settings.next_interval(Duration::from_millis(2000)),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_from_config() {
        let config = DispatchConfig {
            timeout_ms: 1000,
            poll_interval_ms: 100,
            max_poll_interval_ms: 400,
            poll_backoff: 2.0,
        };
        let settings = PollSettings::from(&config);
        assert_eq!(settings.timeout, Duration::from_millis(1000));
        assert_eq!(settings.schedule(4), vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(400),
        ]);
    }
}
