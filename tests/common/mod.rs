//! Shared fixtures: a scripted ipmitool stand-in that records every command it receives.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ipmi_silencer::config::{AgentConfig, ControlPlan};
use ipmi_silencer::daemon::FanController;
use ipmi_silencer::error::TransientError;
use ipmi_silencer::system::{CommandOutput, CommandRunner, IpmiChannel};

pub const MANUAL: &str = "raw 0x30 0x30 0x01 0x00";
pub const AUTOMATIC: &str = "raw 0x30 0x30 0x01 0x01";

/// Dell-style `sdr type temperature` output for the default sensor ids.
pub fn sdr(inlet: i32, exhaust: i32, cpu: &[i32]) -> String {
    let mut text = format!(
        "Inlet Temp       | 04h | ok  |  7.1 | {} degrees C\nExhaust Temp     | 01h | ok  |  7.1 | {} degrees C\n",
        inlet, exhaust
    );
    for (index, temperature) in cpu.iter().enumerate() {
        text.push_str(&format!(
            "Temp             | 0{}h | ok  |  3.{} | {} degrees C\n",
            ["E", "F"][index],
            index + 1,
            temperature
        ));
    }
    text
}

pub const NO_READING: &str = "Inlet Temp       | 04h | ns  |  7.1 | No Reading\n";

#[derive(Default)]
pub struct ScriptedRunner {
    sdr: Mutex<String>,
    log: Mutex<Vec<String>>,
    reject_prefix: Mutex<Option<String>>,
    spawn_failures: AtomicUsize,
    unreadable_queries: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new(sdr: impl Into<String>) -> Arc<Self> {
        let runner = Self::default();
        *runner.sdr.lock().unwrap() = sdr.into();
        Arc::new(runner)
    }

    pub fn set_sdr(&self, sdr: impl Into<String>) {
        *self.sdr.lock().unwrap() = sdr.into();
    }

    /// Commands starting with `prefix` get an ipmitool error response.
    pub fn reject(&self, prefix: &str) {
        *self.reject_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    /// The next `count` invocations fail to spawn.
    pub fn fail_next(&self, count: usize) {
        self.spawn_failures.store(count, Ordering::SeqCst);
    }

    /// The next `count` sensor queries return a sensor with no reading.
    pub fn unreadable_next(&self, count: usize) {
        self.unreadable_queries.store(count, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Everything except sensor queries.
    pub fn writes(&self) -> Vec<String> {
        self.commands().into_iter().filter(|c| !c.starts_with("sdr")).collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, TransientError> {
        self.log.lock().unwrap().push(command.to_string());

        if take_one(&self.spawn_failures) {
            return Err(TransientError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "ipmitool",
            )));
        }

        if command.starts_with("sdr") {
            if take_one(&self.unreadable_queries) {
                return Ok(CommandOutput::accepted(NO_READING));
            }
            return Ok(CommandOutput::accepted(self.sdr.lock().unwrap().clone()));
        }

        let rejected = self
            .reject_prefix
            .lock()
            .unwrap()
            .as_deref()
            .is_some_and(|prefix| command.starts_with(prefix));
        if rejected {
            return Ok(CommandOutput {
                exit_ok: false,
                stdout: String::new(),
                stderr: "Unable to send RAW command (channel=0x0 netfn=0x30 lun=0x0 cmd=0x30 rsp=0xc1): Error".to_string(),
            });
        }

        Ok(CommandOutput::accepted(""))
    }
}

/// Default config with a fast retry schedule.
pub fn test_config() -> AgentConfig {
    let mut config = AgentConfig::default();
    config.retry.initial_delay_ms = 10;
    config
}

pub fn controller(config: &AgentConfig, runner: Arc<ScriptedRunner>) -> (FanController, Arc<IpmiChannel>) {
    let plan = ControlPlan::from_config(config).unwrap();
    let channel = Arc::new(IpmiChannel::new(runner, plan.retry.clone()));
    (FanController::new(plan, Arc::clone(&channel)), channel)
}

pub fn speed_command(slot: u8, percent: u8) -> String {
    format!("raw 0x30 0x30 0x02 0x{:02x} {}", slot - 1, percent)
}
