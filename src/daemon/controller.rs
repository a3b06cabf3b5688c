//! The control loop: read sensors, decide, command, sleep.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::types::FallbackPolicy;
use crate::config::ControlPlan;
use crate::error::{ControlError, Result};
use crate::hardware::{
    EnvironmentRequestHandler, FanControlCommandHandler, FanMode, FanSpeedCommandHandler, FanSpeedRequestHandler,
    FanType, TemperatureReading, TemperatureRequestHandler,
};
use crate::system::IpmiChannel;
use crate::tables::FanSpeed;

/// What the loop did for one CPU socket in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CpuDecision {
    /// Manual mode with a table-derived speed.
    Manual { speed: FanSpeed },
    /// Above the critical limit; the BMC was handed control.
    Automatic,
    /// Below the limit, but an earlier CPU already engaged automatic control this cycle.
    Deferred,
}

/// Outcome of one completed control cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub reading: TemperatureReading,
    pub inlet_offset: i32,
    pub cpus: Vec<CpuDecision>,
    pub automatic_fallback: bool,
    pub pci_speed: Option<FanSpeed>,
    pub nic_speed: Option<FanSpeed>,
    pub rejected_commands: u32,
}

pub struct FanController {
    temperature: TemperatureRequestHandler,
    environment: EnvironmentRequestHandler,
    speeds: FanSpeedRequestHandler,
    fan_control: FanControlCommandHandler,
    fan_speed: FanSpeedCommandHandler,
    critical_temperature: i32,
    interval: Duration,
    fallback_policy: FallbackPolicy,
    latched: bool,
}

impl FanController {
    pub fn new(plan: ControlPlan, channel: Arc<IpmiChannel>) -> Self {
        Self {
            temperature: TemperatureRequestHandler::new(Arc::clone(&channel), plan.sensors),
            environment: EnvironmentRequestHandler::new(plan.inlet),
            speeds: FanSpeedRequestHandler::new(
                plan.cpu_thresholds,
                plan.cpu_speeds,
                plan.exhaust_thresholds,
                plan.exhaust_speeds,
                plan.offsets,
            ),
            fan_control: FanControlCommandHandler::new(Arc::clone(&channel)),
            fan_speed: FanSpeedCommandHandler::new(channel, plan.slots),
            critical_temperature: plan.critical_temperature,
            interval: plan.interval,
            fallback_policy: plan.fallback_policy,
            latched: false,
        }
    }

    /// Whether a critical event earlier in the run still suppresses PCI/NIC control.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Run cycles until `cancel` fires. A failed cycle is logged and abandoned; the next one
    /// starts after the normal interval. Only cancellation ends the loop.
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!("Fan control started at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

        loop {
            match self.run_cycle(&cancel).await {
                Ok(_) => {}
                Err(ControlError::Cancelled) => break,
                Err(e) => error!("Control cycle abandoned: {}", e),
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("Fan control stopped at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    }

    /// One full cycle. Sensor or channel failures abort it with an error; a command the BMC
    /// refused is counted in the report and the cycle carries on.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> Result<CycleReport> {
        let reading = self.temperature.get_readings(cancel).await?;
        let inlet_offset = self.environment.get_offset(reading.inlet);

        let mut rejected_commands = 0;
        let mut automatic_fallback = false;
        let mut cpus = Vec::with_capacity(reading.cpu.len());

        for (index, &temperature) in reading.cpu.iter().enumerate() {
            let cpu_id = index + 1;

            if temperature > self.critical_temperature {
                if !self.fan_control.set_fan_control(FanMode::Automatic, cancel).await? {
                    rejected_commands += 1;
                }
                automatic_fallback = true;
                error!(
                    "Set fan control to automatic due to temperature {}°C on CPU {}",
                    temperature, cpu_id
                );
                cpus.push(CpuDecision::Automatic);
                continue;
            }

            if automatic_fallback {
                warn!(
                    "CPU {} at {}°C left under automatic control for this cycle",
                    cpu_id, temperature
                );
                cpus.push(CpuDecision::Deferred);
                continue;
            }

            if !self.fan_control.set_fan_control(FanMode::Manual, cancel).await? {
                rejected_commands += 1;
            }
            let speed = self.speeds.cpu_fan_speed(index, temperature, inlet_offset);
            if !self.fan_speed.set_cpu_fan_speed(index, speed, cancel).await? {
                rejected_commands += 1;
            }
            info!(
                "Set fan speed to {}% for CPU {} with temperature {}°C",
                speed, cpu_id, temperature
            );
            cpus.push(CpuDecision::Manual { speed });
        }

        if automatic_fallback && self.fallback_policy == FallbackPolicy::Latched {
            self.latched = true;
        }

        let mut pci_speed = None;
        let mut nic_speed = None;
        if automatic_fallback || self.latched {
            info!("Automatic fan control engaged, skipping PCI and NIC fan speeds");
        } else {
            for fan_type in [FanType::Pci, FanType::Nic] {
                let speed = self.speeds.pci_fan_speed(fan_type, reading.exhaust, inlet_offset);
                if !self.fan_speed.set_group_fan_speed(fan_type, speed, cancel).await? {
                    rejected_commands += 1;
                }
                info!(
                    "Set fan speed to {}% for {} with exhaust temperature of {}°C",
                    speed, fan_type, reading.exhaust
                );
                match fan_type {
                    FanType::Pci => pci_speed = Some(speed),
                    FanType::Nic => nic_speed = Some(speed),
                }
            }
        }

        info!(
            "Temperature check complete (automatic fallback: {}, rejected commands: {})",
            automatic_fallback, rejected_commands
        );

        Ok(CycleReport {
            reading,
            inlet_offset,
            cpus,
            automatic_fallback,
            pci_speed,
            nic_speed,
            rejected_commands,
        })
    }

    /// Hand fan control back to the BMC. Used by the process host on shutdown.
    pub async fn restore_automatic(&self, cancel: &CancellationToken) -> Result<bool> {
        self.fan_control.set_fan_control(FanMode::Automatic, cancel).await
    }
}
