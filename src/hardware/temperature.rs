//! Temperature acquisition.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::types::TemperatureReading;
use crate::config::types::SensorSettings;
use crate::error::Result;
use crate::system::IpmiChannel;

pub struct TemperatureRequestHandler {
    channel: Arc<IpmiChannel>,
    sensors: SensorSettings,
}

impl TemperatureRequestHandler {
    pub fn new(channel: Arc<IpmiChannel>, sensors: SensorSettings) -> Self {
        Self { channel, sensors }
    }

    pub fn cpu_count(&self) -> usize {
        self.sensors.cpu.len()
    }

    /// Reads inlet, exhaust, then each CPU in socket order. The first failure aborts the
    /// whole reading.
    pub async fn get_readings(&self, cancel: &CancellationToken) -> Result<TemperatureReading> {
        info!("Temperature check at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

        let inlet = self.read(&self.sensors.inlet, "inlet", cancel).await?;
        let exhaust = self.read(&self.sensors.exhaust, "exhaust", cancel).await?;

        let mut cpu = Vec::with_capacity(self.sensors.cpu.len());
        for sensor_id in &self.sensors.cpu {
            cpu.push(self.read(sensor_id, "cpu", cancel).await?);
        }

        Ok(TemperatureReading { inlet, exhaust, cpu })
    }

    async fn read(&self, sensor_id: &str, label: &str, cancel: &CancellationToken) -> Result<i32> {
        let value = self.channel.read_sensor(sensor_id, cancel).await?;
        debug!("Sensor {} ({}): {}°C", sensor_id, label, value);
        Ok(value)
    }
}
