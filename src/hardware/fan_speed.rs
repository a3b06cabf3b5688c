//! Fan speed decisions and per-slot speed commands.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::commands::fan_speed_command;
use super::types::{FanSlots, FanType, ZoneOffsets};
use crate::error::Result;
use crate::system::IpmiChannel;
use crate::tables::{FanSpeed, SpeedTable, ThresholdTable};

/// Zone lookup, base speed, then one offset-and-clamp. Pure.
pub fn fan_speed(thresholds: &ThresholdTable, speeds: &SpeedTable, temperature: i32, offset: i32) -> FanSpeed {
    let zone = thresholds.index(temperature);
    speeds.speed_for(zone as isize).with_offset(offset)
}

/// Computes target speeds from the step tables. Holds no channel and issues no commands.
pub struct FanSpeedRequestHandler {
    cpu_thresholds: ThresholdTable,
    cpu_speeds: SpeedTable,
    exhaust_thresholds: ThresholdTable,
    exhaust_speeds: SpeedTable,
    offsets: ZoneOffsets,
}

impl FanSpeedRequestHandler {
    pub fn new(
        cpu_thresholds: ThresholdTable,
        cpu_speeds: SpeedTable,
        exhaust_thresholds: ThresholdTable,
        exhaust_speeds: SpeedTable,
        offsets: ZoneOffsets,
    ) -> Self {
        Self {
            cpu_thresholds,
            cpu_speeds,
            exhaust_thresholds,
            exhaust_speeds,
            offsets,
        }
    }

    pub fn cpu_fan_speed(&self, cpu_index: usize, cpu_temperature: i32, inlet_offset: i32) -> FanSpeed {
        let offset = self.offsets.cpu_offset(cpu_index).saturating_add(inlet_offset);
        fan_speed(&self.cpu_thresholds, &self.cpu_speeds, cpu_temperature, offset)
    }

    /// Shared by the PCI and NIC groups; only the bias differs.
    pub fn pci_fan_speed(&self, fan_type: FanType, exhaust_temperature: i32, inlet_offset: i32) -> FanSpeed {
        let offset = self.offsets.fan_type_offset(fan_type).saturating_add(inlet_offset);
        fan_speed(&self.exhaust_thresholds, &self.exhaust_speeds, exhaust_temperature, offset)
    }
}

pub struct FanSpeedCommandHandler {
    channel: Arc<IpmiChannel>,
    slots: FanSlots,
}

impl FanSpeedCommandHandler {
    pub fn new(channel: Arc<IpmiChannel>, slots: FanSlots) -> Self {
        Self { channel, slots }
    }

    /// Set one physical slot. `Ok(false)` when the BMC refused the command.
    pub async fn set_fan_speed(&self, slot: u8, speed: FanSpeed, cancel: &CancellationToken) -> Result<bool> {
        let command = fan_speed_command(slot, speed);
        let output = self.channel.execute(&command, cancel).await?;

        if output.is_accepted() {
            debug!("Set fan speed for fan {} to {}%", slot, speed);
            Ok(true)
        } else {
            warn!("Failed to set fan speed {}% for fan {}", speed, slot);
            Ok(false)
        }
    }

    pub async fn set_cpu_fan_speed(&self, cpu_index: usize, speed: FanSpeed, cancel: &CancellationToken) -> Result<bool> {
        match self.slots.cpu_slots(cpu_index) {
            Some(slots) => self.set_slots(slots, speed, cancel).await,
            None => {
                error!("Unknown CPU {} selected", cpu_index + 1);
                Ok(false)
            }
        }
    }

    pub async fn set_group_fan_speed(&self, fan_type: FanType, speed: FanSpeed, cancel: &CancellationToken) -> Result<bool> {
        self.set_slots(self.slots.group_slots(fan_type), speed, cancel).await
    }

    /// One command per slot, in order. Not atomic: a refused slot does not undo earlier ones
    /// and does not stop later ones.
    async fn set_slots(&self, slots: &[u8], speed: FanSpeed, cancel: &CancellationToken) -> Result<bool> {
        let mut all_accepted = true;
        for &slot in slots {
            all_accepted &= self.set_fan_speed(slot, speed, cancel).await?;
        }
        Ok(all_accepted)
    }
}
