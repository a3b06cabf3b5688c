//! Retry-protected command channel.
//!
//! Every sensor read and every actuator write goes through [`IpmiChannel::execute`]. A failed
//! invocation of ipmitool (spawn error, timeout) is retried with exponential backoff; a command
//! that ran but was refused by the BMC is returned as-is for the caller to classify.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::parser;
use super::retry::RetryPolicy;
use super::{CommandOutput, CommandRunner};
use crate::error::{ControlError, Result};
use crate::hardware::commands::SENSOR_QUERY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    /// Invocations of the runner, first tries included.
    pub attempts: u64,
    /// Backoff waits taken after a failed attempt.
    pub retries: u64,
}

pub struct IpmiChannel {
    runner: Arc<dyn CommandRunner>,
    policy: RetryPolicy,
    attempts: AtomicU64,
    retries: AtomicU64,
}

impl IpmiChannel {
    pub fn new(runner: Arc<dyn CommandRunner>, policy: RetryPolicy) -> Self {
        Self {
            runner,
            policy,
            attempts: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            attempts: self.attempts.load(Ordering::SeqCst),
            retries: self.retries.load(Ordering::SeqCst),
        }
    }

    /// Execute one command, retrying transient failures up to the policy's attempt budget.
    pub async fn execute(&self, command: &str, cancel: &CancellationToken) -> Result<CommandOutput> {
        let max_attempts = self.policy.max_attempts();
        let delays = self.policy.delays();
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(ControlError::Cancelled);
            }

            attempt += 1;
            self.attempts.fetch_add(1, Ordering::SeqCst);

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ControlError::Cancelled),
                result = self.runner.run(command) => result,
            };

            let failure = match result {
                Ok(output) => {
                    debug!("ipmitool {} -> exit_ok={} ({} bytes)", command, output.exit_ok, output.stdout.len());
                    return Ok(output);
                }
                Err(e) => e,
            };

            if attempt >= max_attempts {
                error!("ipmitool {} failed on final attempt {}/{}: {}", command, attempt, max_attempts, failure);
                return Err(ControlError::ExecutionFailed {
                    command: command.to_string(),
                    attempts: attempt,
                    reason: failure.to_string(),
                });
            }

            let delay = delays[(attempt - 1) as usize];
            self.retries.fetch_add(1, Ordering::SeqCst);
            warn!(
                "ipmitool {} failed: {}. Retrying in {:?} (attempt {}/{})",
                command, failure, delay, attempt + 1, max_attempts
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ControlError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Read one temperature sensor. Unparsable text is reported, never retried.
    pub async fn read_sensor(&self, sensor_id: &str, cancel: &CancellationToken) -> Result<i32> {
        let output = self.execute(SENSOR_QUERY, cancel).await?;
        // No row for this sensor: report the whole response
        let raw = parser::extract_sensor_field(&output.stdout, sensor_id)
            .unwrap_or_else(|| output.stdout.trim().to_string());

        parser::parse_reading(&raw).ok_or_else(|| ControlError::InvalidSensorReading {
            sensor: sensor_id.to_string(),
            raw,
        })
    }
}
