//! Daemon configuration structs and defaults.
//! Defaults reproduce the stock Dell R-series deployment (two CPUs, six fans).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub ipmi: IpmiSettings,
    pub retry: RetrySettings,
    pub sensors: SensorSettings,
    pub control: ControlSettings,
    pub thresholds: ThresholdSettings,
    pub speeds: SpeedSettings,
    pub offsets: OffsetSettings,
    pub fans: FanSlotSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpmiMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpmiSettings {
    pub tool_path: String, // empty = platform default
    pub mode: IpmiMode,
    pub host: String,
    pub user: String,
    pub password: String,
    pub command_timeout_ms: u64,
}

impl Default for IpmiSettings {
    fn default() -> Self {
        Self {
            tool_path: String::new(),
            mode: IpmiMode::Local,
            host: String::new(),
            user: String::new(),
            password: String::new(),
            command_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_factor: 2.0,
        }
    }
}

/// SDR sensor number tokens as printed by `ipmitool sdr type temperature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    pub inlet: String,
    pub exhaust: String,
    pub cpu: Vec<String>, // one per CPU socket, in socket order
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            inlet: "04h".to_string(),
            exhaust: "01h".to_string(),
            cpu: vec!["0Eh".to_string(), "0Fh".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Recompute the automatic-fallback flag every cycle.
    PerCycle,
    /// Once any CPU went critical, PCI/NIC stay unmanaged for the rest of the run.
    Latched,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub interval_ms: u64,
    pub critical_temperature: i32, // °C, above this the BMC takes over
    pub fallback_policy: FallbackPolicy,
    pub restore_automatic_on_exit: bool,
    pub fan_speed_min: i32,
    pub fan_speed_max: i32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            critical_temperature: 80,
            fallback_policy: FallbackPolicy::PerCycle,
            restore_automatic_on_exit: false,
            fan_speed_min: 0,
            fan_speed_max: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    pub cpu: Vec<i32>,
    pub exhaust: Vec<i32>,
    pub inlet: Vec<i32>,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            cpu: vec![45, 50, 55, 60, 65, 70, 75, 80],
            exhaust: vec![45, 50, 55, 60, 65, 70, 75, 80],
            inlet: vec![20, 23, 26, 29, 32, 35, 38, 41],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    pub cpu: Vec<i32>,
    pub exhaust: Vec<i32>,
    pub offset: i32, // applied to every table entry at load time
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            cpu: vec![20, 25, 30, 35, 40, 45, 50, 60],
            exhaust: vec![20, 25, 30, 35, 40, 45, 50, 60],
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetSettings {
    pub cpu: Vec<i32>, // one per CPU socket
    pub pci: i32,
    pub nic: i32,
    pub inlet: Vec<i32>, // one per inlet zone
}

impl Default for OffsetSettings {
    fn default() -> Self {
        Self {
            cpu: vec![0, 8],
            pci: -5,
            nic: 4,
            inlet: vec![0, 1, 2, 3, 4, 5, 6, 7],
        }
    }
}

/// Physical fan slot numbers (1-based, as labelled on the chassis).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanSlotSettings {
    pub cpu: Vec<Vec<u8>>, // slots cooling each CPU socket
    pub pci: Vec<u8>,
    pub nic: Vec<u8>,
}

impl Default for FanSlotSettings {
    fn default() -> Self {
        Self {
            cpu: vec![vec![2], vec![5]],
            pci: vec![1, 3, 6],
            nic: vec![4],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
