//! Command-line argument definitions (clap) and help text.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::types::LogFormat;

pub const HELP_TEXT: &str = "
IPMI Silencer - temperature-driven fan control for Dell PowerEdge servers
Usage: ipmi-silencer [OPTIONS]

Options:
  -h, --help                    Print help
  -V, --version                 Print version
Run:
  -c, --config <PATH>           Config file (default: config.json next to the binary)
      --once                    Run a single control cycle and print its report
      --dry-run                 Read sensors but only log fan commands
Service:
  -I, --install-service         Install systemd service for auto-start on boot
  -U, --uninstall-service       Uninstall systemd service
Config & Debug:
      --check                   Run health check (config, ipmitool, BMC check)
      --print-config            Print the effective configuration
      --init-config             Write the default configuration to the config path
      --log-level <LOG_LEVEL>   Set log level (TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL)
      --log-format <FORMAT>     Log output format (text, json)
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ipmi-silencer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Temperature-driven IPMI fan control", long_about = None)]
pub struct Args {
    // === Run ===
    /// Config file (default: config.json next to the binary)
    #[arg(short = 'c', long, value_name = "PATH", help_heading = "Run")]
    pub config: Option<PathBuf>,

    /// Run a single control cycle and print its report
    #[arg(long, help_heading = "Run")]
    pub once: bool,

    /// Read sensors but only log fan commands
    #[arg(long = "dry-run", help_heading = "Run")]
    pub dry_run: bool,

    // === Service ===
    /// Install systemd service for auto-start on boot
    #[arg(short = 'I', long = "install-service", help_heading = "Service")]
    pub install_service: bool,

    /// Uninstall systemd service
    #[arg(short = 'U', long = "uninstall-service", help_heading = "Service")]
    pub uninstall_service: bool,

    // === Config & Debug ===
    /// Run health check (config, ipmitool, BMC check)
    #[arg(long, help_heading = "Config & Debug")]
    pub check: bool,

    /// Print the effective configuration
    #[arg(long = "print-config", help_heading = "Config & Debug")]
    pub print_config: bool,

    /// Write the default configuration to the config path
    #[arg(long = "init-config", help_heading = "Config & Debug")]
    pub init_config: bool,

    /// Set log level (TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL)
    #[arg(long = "log-level", help_heading = "Config & Debug")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_enum, help_heading = "Config & Debug")]
    pub log_format: Option<LogFormatArg>,
}
