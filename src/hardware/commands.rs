//! Dell OEM command grammar. These strings go to the BMC unchanged.

use super::types::FanMode;
use crate::error::{ControlError, Result};
use crate::tables::FanSpeed;

/// All temperature-type SDR records.
pub const SENSOR_QUERY: &str = "sdr type temperature";

/// BMC identity query used by the health check.
pub const MC_INFO: &str = "mc info";

/// Disable the BMC thermal algorithm (0x30 0x30 0x01, enable = 0x00).
pub const MANUAL_MODE_COMMAND: &str = "raw 0x30 0x30 0x01 0x00";

/// Hand fan control back to the BMC (0x30 0x30 0x01, enable = 0x01).
pub const AUTOMATIC_MODE_COMMAND: &str = "raw 0x30 0x30 0x01 0x01";

/// Highest slot addressable by the one-byte fan id.
pub const MAX_FAN_SLOT: u8 = 16;

pub fn fan_mode_command(mode: FanMode) -> &'static str {
    match mode {
        FanMode::Manual => MANUAL_MODE_COMMAND,
        FanMode::Automatic => AUTOMATIC_MODE_COMMAND,
    }
}

pub fn validate_slot(slot: u8) -> Result<()> {
    if slot == 0 || slot > MAX_FAN_SLOT {
        return Err(ControlError::validation(format!(
            "fan slot {} must be between 1 and {}",
            slot, MAX_FAN_SLOT
        )));
    }
    Ok(())
}

/// `raw 0x30 0x30 0x02 <fan id> <percent>`, fan id = slot - 1.
/// Callers pass validated slots; slot 0 would wrap and is rejected at config load.
pub fn fan_speed_command(slot: u8, speed: FanSpeed) -> String {
    format!("raw 0x30 0x30 0x02 0x{:02x} {}", slot.wrapping_sub(1), speed.percent())
}
