//! Config file to validated plan.

use std::time::Duration;

use ipmi_silencer::config::persistence::load_config;
use ipmi_silencer::config::types::{FallbackPolicy, IpmiMode, LogFormat};
use ipmi_silencer::config::ControlPlan;
use ipmi_silencer::ControlError;

const FULL_CONFIG: &str = r#"{
  "ipmi": {
    "tool_path": "/usr/local/bin/ipmitool",
    "mode": "remote",
    "host": "192.168.1.120",
    "user": "root",
    "password": "calvin",
    "command_timeout_ms": 5000
  },
  "retry": { "max_attempts": 5, "initial_delay_ms": 250, "backoff_factor": 1.5 },
  "sensors": { "inlet": "04h", "exhaust": "01h", "cpu": ["0Eh"] },
  "control": {
    "interval_ms": 5000,
    "critical_temperature": 75,
    "fallback_policy": "latched",
    "restore_automatic_on_exit": true,
    "fan_speed_min": 10,
    "fan_speed_max": 90
  },
  "thresholds": {
    "cpu": [40, 45, 50, 55, 60, 65, 70, 75],
    "exhaust": [35, 40, 45, 50, 55, 60, 65, 70],
    "inlet": [20, 23, 26, 29, 32, 35, 38, 41]
  },
  "speeds": {
    "cpu": [5, 25, 30, 35, 40, 45, 50, 95],
    "exhaust": [20, 25, 30, 35, 40, 45, 50, 60],
    "offset": 0
  },
  "offsets": { "cpu": [3], "pci": -5, "nic": 4, "inlet": [0, 1, 2, 3, 4, 5, 6, 7] },
  "fans": { "cpu": [[2, 5]], "pci": [1, 3, 6], "nic": [4] },
  "logging": { "level": "debug", "format": "json" }
}"#;

fn write_config(text: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, text).unwrap();
    (dir, path)
}

#[tokio::test]
async fn test_full_config_builds_plan() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let config = load_config(&path).await.unwrap();

    assert_eq!(config.ipmi.mode, IpmiMode::Remote);
    assert!(config.control.restore_automatic_on_exit);
    assert_eq!(config.logging.format, LogFormat::Json);

    let plan = ControlPlan::from_config(&config).unwrap();
    assert_eq!(plan.cpu_count(), 1);
    assert_eq!(plan.interval, Duration::from_secs(5));
    assert_eq!(plan.critical_temperature, 75);
    assert_eq!(plan.fallback_policy, FallbackPolicy::Latched);
    assert_eq!(plan.retry.max_attempts(), 5);
    assert_eq!(plan.slots.cpu, vec![vec![2, 5]]);
    // table entries are clamped into the configured 10-90 range
    assert_eq!(plan.cpu_speeds.values(), [10, 25, 30, 35, 40, 45, 50, 90]);
}

#[tokio::test]
async fn test_descending_speeds_fail_validation() {
    let (_dir, path) = write_config(r#"{ "speeds": { "cpu": [20, 25, 30, 35, 40, 45, 60, 50] } }"#);
    let config = load_config(&path).await.unwrap();

    let err = ControlPlan::from_config(&config).unwrap_err();
    assert!(matches!(err, ControlError::Validation(ref msg) if msg.contains("ascending")));
}

#[tokio::test]
async fn test_out_of_range_threshold_fails_validation() {
    let (_dir, path) = write_config(r#"{ "thresholds": { "inlet": [20, 23, 26, 29, 32, 35, 38, 141] } }"#);
    let config = load_config(&path).await.unwrap();

    assert!(ControlPlan::from_config(&config).is_err());
}

#[tokio::test]
async fn test_cpu_sensor_count_must_match_offsets() {
    let (_dir, path) = write_config(r#"{ "sensors": { "cpu": ["0Eh", "0Fh", "10h"] } }"#);
    let config = load_config(&path).await.unwrap();

    assert!(matches!(
        ControlPlan::from_config(&config),
        Err(ControlError::Validation(_))
    ));
}

#[tokio::test]
async fn test_unknown_fallback_policy_is_a_parse_error() {
    let (_dir, path) = write_config(r#"{ "control": { "fallback_policy": "sometimes" } }"#);
    assert!(load_config(&path).await.is_err());
}
