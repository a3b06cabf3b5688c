//! Exponential backoff schedule for the channel.

use std::time::Duration;

use crate::error::{ControlError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_factor: f64) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ControlError::validation("retry max_attempts must be at least 1"));
        }
        if initial_delay.is_zero() {
            return Err(ControlError::validation("retry initial_delay_ms must be greater than 0"));
        }
        if !backoff_factor.is_finite() || backoff_factor <= 1.0 {
            return Err(ControlError::validation(format!(
                "retry backoff_factor must be greater than 1.0, got {}",
                backoff_factor
            )));
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            backoff_factor,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// `delay[i] = initial_delay * backoff_factor^i`, one entry per attempt.
    /// The wait after failed attempt `k` (1-based) is `delay[k - 1]`.
    pub fn delays(&self) -> Vec<Duration> {
        let initial = self.initial_delay.as_secs_f64();
        (0..self.max_attempts)
            .map(|i| {
                let secs = initial * self.backoff_factor.powi(i as i32);
                Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_sequence() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000), 2.0).unwrap();
        assert_eq!(
            policy.delays(),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000)
            ]
        );
    }

    #[test]
    fn test_delays_strictly_increase() {
        let policy = RetryPolicy::new(12, Duration::from_millis(50), 1.5).unwrap();
        let delays = policy.delays();
        assert_eq!(delays.len(), 12);
        assert!(delays.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(policy.delays(), delays);
    }

    #[test]
    fn test_rejects_invalid_policy() {
        assert!(RetryPolicy::new(0, Duration::from_millis(10), 2.0).is_err());
        assert!(RetryPolicy::new(3, Duration::ZERO, 2.0).is_err());
        assert!(RetryPolicy::new(3, Duration::from_millis(10), 1.0).is_err());
        assert!(RetryPolicy::new(3, Duration::from_millis(10), f64::NAN).is_err());
    }
}
