//! Validated, immutable form of [`AgentConfig`] built once at startup.

use std::time::Duration;

use crate::config::types::{AgentConfig, FallbackPolicy, IpmiMode, SensorSettings};
use crate::error::{ControlError, Result};
use crate::hardware::commands::validate_slot;
use crate::hardware::{FanSlots, ZoneOffsets};
use crate::system::RetryPolicy;
use crate::tables::{FanSpeedRange, InletOffsetTable, SpeedTable, TemperatureThreshold, ThresholdTable};

#[derive(Debug, Clone)]
pub struct ControlPlan {
    pub cpu_thresholds: ThresholdTable,
    pub cpu_speeds: SpeedTable,
    pub exhaust_thresholds: ThresholdTable,
    pub exhaust_speeds: SpeedTable,
    pub inlet: InletOffsetTable,
    pub offsets: ZoneOffsets,
    pub slots: FanSlots,
    pub sensors: SensorSettings,
    pub retry: RetryPolicy,
    pub interval: Duration,
    pub critical_temperature: i32,
    pub fallback_policy: FallbackPolicy,
}

impl ControlPlan {
    /// Checks every table and cross-section constraint. Any failure is a `Validation` or
    /// `Range` error and must stop the process before the first cycle.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let control = &config.control;

        if control.interval_ms == 0 {
            return Err(ControlError::validation("control interval_ms must be greater than 0"));
        }
        TemperatureThreshold::new(control.critical_temperature)?;
        let range = FanSpeedRange::new(control.fan_speed_min, control.fan_speed_max)?;

        let ipmi = &config.ipmi;
        if ipmi.mode == IpmiMode::Remote && ipmi.host.trim().is_empty() {
            return Err(ControlError::validation("remote IPMI mode requires ipmi.host"));
        }
        if ipmi.command_timeout_ms == 0 {
            return Err(ControlError::validation("ipmi command_timeout_ms must be greater than 0"));
        }

        let sensors = &config.sensors;
        if sensors.inlet.trim().is_empty() || sensors.exhaust.trim().is_empty() {
            return Err(ControlError::validation("inlet and exhaust sensor ids must be set"));
        }
        if sensors.cpu.is_empty() || sensors.cpu.iter().any(|id| id.trim().is_empty()) {
            return Err(ControlError::validation("at least one non-empty CPU sensor id is required"));
        }

        let cpu_count = sensors.cpu.len();
        if config.offsets.cpu.len() != cpu_count {
            return Err(ControlError::validation(format!(
                "offsets.cpu has {} entries but {} CPU sensors are configured",
                config.offsets.cpu.len(),
                cpu_count
            )));
        }
        if config.fans.cpu.len() != cpu_count {
            return Err(ControlError::validation(format!(
                "fans.cpu has {} slot lists but {} CPU sensors are configured",
                config.fans.cpu.len(),
                cpu_count
            )));
        }

        let fans = &config.fans;
        for slot in fans.cpu.iter().flatten().chain(&fans.pci).chain(&fans.nic) {
            validate_slot(*slot)?;
        }

        let retry = RetryPolicy::new(
            config.retry.max_attempts,
            Duration::from_millis(config.retry.initial_delay_ms),
            config.retry.backoff_factor,
        )?;

        let thresholds = &config.thresholds;
        let speeds = &config.speeds;
        let inlet_thresholds = ThresholdTable::new(&thresholds.inlet)?;

        Ok(Self {
            cpu_thresholds: ThresholdTable::new(&thresholds.cpu)?,
            cpu_speeds: SpeedTable::new(&speeds.cpu, speeds.offset, range)?,
            exhaust_thresholds: ThresholdTable::new(&thresholds.exhaust)?,
            exhaust_speeds: SpeedTable::new(&speeds.exhaust, speeds.offset, range)?,
            inlet: InletOffsetTable::new(inlet_thresholds, &config.offsets.inlet)?,
            offsets: ZoneOffsets {
                cpu: config.offsets.cpu.clone(),
                pci: config.offsets.pci,
                nic: config.offsets.nic,
            },
            slots: FanSlots {
                cpu: fans.cpu.clone(),
                pci: fans.pci.clone(),
                nic: fans.nic.clone(),
            },
            sensors: sensors.clone(),
            retry,
            interval: Duration::from_millis(control.interval_ms),
            critical_temperature: control.critical_temperature,
            fallback_policy: control.fallback_policy,
        })
    }

    pub fn cpu_count(&self) -> usize {
        self.sensors.cpu.len()
    }
}
