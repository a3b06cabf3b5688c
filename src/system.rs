//! Command/response channel to the chassis controller.
//! `executor` talks to ipmitool, `channel` adds retry, backoff and cancellation on top,
//! `parser` interprets the text that comes back.

use std::sync::Arc;

use async_trait::async_trait;

pub mod channel;
pub mod executor;
pub mod parser;
pub mod retry;

pub use channel::{ChannelStats, IpmiChannel};
pub use executor::{DryRunRunner, IpmiToolRunner};
pub use retry::RetryPolicy;

use crate::config::types::IpmiSettings;
use crate::error::TransientError;

/// Raw result of one ipmitool invocation that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_ok: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn accepted(stdout: impl Into<String>) -> Self {
        Self {
            exit_ok: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the controller took the command. See [`parser::response_indicates_success`].
    pub fn is_accepted(&self) -> bool {
        parser::response_indicates_success(self)
    }
}

/// Runs a single attempt of a command. Implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<CommandOutput, TransientError>;
}

/// Channel over the real ipmitool, optionally wrapped so writes are only logged.
pub fn open_channel(settings: &IpmiSettings, policy: RetryPolicy, dry_run: bool) -> IpmiChannel {
    let runner: Arc<dyn CommandRunner> = Arc::new(IpmiToolRunner::new(settings));
    let runner: Arc<dyn CommandRunner> = if dry_run {
        Arc::new(DryRunRunner::new(runner))
    } else {
        runner
    };
    IpmiChannel::new(runner, policy)
}
