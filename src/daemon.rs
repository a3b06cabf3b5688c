//! Daemon: control loop, service unit, health check.

pub mod controller;
pub mod status;
pub mod systemd;

pub use controller::{CpuDecision, CycleReport, FanController};

pub const SERVICE_NAME: &str = "ipmi-silencer";
pub const SYSTEMD_SERVICE_PATH: &str = "/etc/systemd/system/ipmi-silencer.service";

pub const SYSTEMD_SERVICE_TEMPLATE: &str = r#"[Unit]
Description=IPMI Silencer fan control
After=network.target

[Service]
Type=simple
ExecStart={{EXEC_PATH}} --config {{CONFIG_PATH}}
Restart=on-failure
RestartSec=10
User=root
WorkingDirectory={{WORK_DIR}}
StandardOutput=journal
StandardError=journal

[Install]
WantedBy=multi-user.target
"#;
