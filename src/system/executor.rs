//! ipmitool subprocess executor.
//! Builds the ipmitool invocation for local or remote (lanplus) access and runs one attempt.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, trace};

use super::{CommandOutput, CommandRunner};
use crate::config::types::{IpmiMode, IpmiSettings};
use crate::error::TransientError;

pub const DEFAULT_LINUX_PATH: &str = "/usr/bin/ipmitool";
pub const DEFAULT_WINDOWS_PATH: &str = r"C:\Program Files (x86)\Dell\SysMgt\bmc\ipmitool.exe";

/// Configured tool path, or the platform default when left empty.
pub fn resolve_tool_path(settings: &IpmiSettings) -> PathBuf {
    if !settings.tool_path.trim().is_empty() {
        return PathBuf::from(settings.tool_path.trim());
    }
    if cfg!(windows) {
        PathBuf::from(DEFAULT_WINDOWS_PATH)
    } else {
        PathBuf::from(DEFAULT_LINUX_PATH)
    }
}

/// Interface flags placed before every command.
/// Local access uses the in-band driver, remote access routes via LAN to the BMC.
pub fn connection_args(settings: &IpmiSettings) -> Vec<String> {
    match settings.mode {
        IpmiMode::Local => Vec::new(),
        IpmiMode::Remote => vec![
            "-I".to_string(),
            "lanplus".to_string(),
            "-H".to_string(),
            settings.host.clone(),
            "-U".to_string(),
            settings.user.clone(),
            "-P".to_string(),
            settings.password.clone(),
        ],
    }
}

pub struct IpmiToolRunner {
    program: PathBuf,
    connection_args: Vec<String>,
    timeout: Duration,
}

impl IpmiToolRunner {
    pub fn new(settings: &IpmiSettings) -> Self {
        let program = resolve_tool_path(settings);
        if settings.mode == IpmiMode::Remote {
            debug!("IPMI routing to remote BMC: {} as {}", settings.host, settings.user);
        }
        Self {
            program,
            connection_args: connection_args(settings),
            timeout: Duration::from_millis(settings.command_timeout_ms),
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn build_command(&self, command: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.connection_args);
        cmd.args(command.split_whitespace());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for IpmiToolRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, TransientError> {
        let mut cmd = self.build_command(command);

        trace!("Executing: {} {}", self.program.display(), command);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| TransientError::Timeout(self.timeout))??;

        Ok(CommandOutput {
            exit_ok: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Passes reads through and swallows writes. Every `raw` command is logged and answered
/// as accepted without reaching the controller.
pub struct DryRunRunner {
    inner: Arc<dyn CommandRunner>,
}

impl DryRunRunner {
    pub fn new(inner: Arc<dyn CommandRunner>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, TransientError> {
        if command.split_whitespace().next() == Some("raw") {
            info!("[DRY RUN] Would execute: ipmitool {}", command);
            return Ok(CommandOutput::accepted(""));
        }
        self.inner.run(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockCommandRunner;

    fn remote_settings() -> IpmiSettings {
        IpmiSettings {
            mode: IpmiMode::Remote,
            host: "10.0.0.5".to_string(),
            user: "root".to_string(),
            password: "calvin".to_string(),
            ..IpmiSettings::default()
        }
    }

    #[test]
    fn test_connection_args() {
        assert!(connection_args(&IpmiSettings::default()).is_empty());
        assert_eq!(
            connection_args(&remote_settings()),
            vec!["-I", "lanplus", "-H", "10.0.0.5", "-U", "root", "-P", "calvin"]
        );
    }

    #[test]
    fn test_tool_path_resolution() {
        let mut settings = IpmiSettings::default();
        let default = resolve_tool_path(&settings);
        assert!(default == PathBuf::from(DEFAULT_LINUX_PATH) || default == PathBuf::from(DEFAULT_WINDOWS_PATH));

        settings.tool_path = " /opt/ipmitool/bin/ipmitool ".to_string();
        assert_eq!(resolve_tool_path(&settings), PathBuf::from("/opt/ipmitool/bin/ipmitool"));
    }

    #[test]
    fn test_build_command_splits_raw_bytes() {
        let runner = IpmiToolRunner::new(&remote_settings());
        let cmd = runner.build_command("raw 0x30 0x30 0x01 0x00");
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(&args[..2], &["-I", "lanplus"]);
        assert_eq!(&args[8..], &["raw", "0x30", "0x30", "0x01", "0x00"]);
    }

    #[tokio::test]
    async fn test_missing_tool_is_transient() {
        let settings = IpmiSettings {
            tool_path: "/nonexistent/ipmitool-for-tests".to_string(),
            ..IpmiSettings::default()
        };
        let result = IpmiToolRunner::new(&settings).run("mc info").await;
        assert!(matches!(result, Err(TransientError::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stalled_tool_times_out() {
        // `sleep 30` stands in for an ipmitool session that never answers
        let settings = IpmiSettings {
            tool_path: "sleep".to_string(),
            command_timeout_ms: 100,
            ..IpmiSettings::default()
        };
        let started = std::time::Instant::now();
        let result = IpmiToolRunner::new(&settings).run("30").await;

        assert!(matches!(result, Err(TransientError::Timeout(limit)) if limit == Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_dry_run_swallows_writes_only() {
        let mut inner = MockCommandRunner::new();
        inner
            .expect_run()
            .withf(|command: &str| command == "sdr type temperature")
            .times(1)
            .returning(|_| Ok(CommandOutput::accepted("Inlet Temp | 04h | ok | 7.1 | 23 degrees C")));

        let runner = DryRunRunner::new(Arc::new(inner));
        let write = runner.run("raw 0x30 0x30 0x02 0x01 40").await.unwrap();
        assert!(write.is_accepted());
        let read = runner.run("sdr type temperature").await.unwrap();
        assert!(read.stdout.contains("04h"));
    }
}
