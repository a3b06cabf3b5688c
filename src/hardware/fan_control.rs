//! Manual/automatic fan control mode switching.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::commands::fan_mode_command;
use super::types::FanMode;
use crate::error::Result;
use crate::system::IpmiChannel;

pub struct FanControlCommandHandler {
    channel: Arc<IpmiChannel>,
}

impl FanControlCommandHandler {
    pub fn new(channel: Arc<IpmiChannel>) -> Self {
        Self { channel }
    }

    /// Returns whether the BMC accepted the mode change. A refusal is logged, not raised;
    /// only channel exhaustion or cancellation come back as errors.
    pub async fn set_fan_control(&self, mode: FanMode, cancel: &CancellationToken) -> Result<bool> {
        let output = self.channel.execute(fan_mode_command(mode), cancel).await?;

        if output.is_accepted() {
            debug!("Set fan control mode to {}.", mode);
            Ok(true)
        } else {
            error!("Failed to set fan control mode to {}: {}", mode, output.stderr.trim());
            Ok(false)
        }
    }
}
