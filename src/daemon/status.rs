use anyhow::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::config::persistence::load_config;
use crate::config::ControlPlan;
use crate::hardware::commands::MC_INFO;
use crate::system::executor::resolve_tool_path;
use crate::system::open_channel;

/// Run health check: config, tool, service, and a live `mc info` query.
/// Returns whether every required check passed.
pub async fn run_health_check(config_path: &Path) -> Result<bool> {
    println!("\x1b[32mipmi-silencer v{} ({})\x1b[0m", env!("CARGO_PKG_VERSION"), std::env::consts::ARCH);
    println!("Health Check");
    println!("============\n");

    let mut all_ok = true;

    if config_path.exists() {
        println!("✓ Config file: {}", config_path.display());
    } else {
        println!("⚠ Config file: {} not found (using defaults)", config_path.display());
    }

    let config = match load_config(config_path).await {
        Ok(config) => config,
        Err(e) => {
            println!("✗ Config: {:#}", e);
            println!("\n\x1b[33m⚠ Some issues found - see above\x1b[0m");
            return Ok(false);
        }
    };

    let plan = match ControlPlan::from_config(&config) {
        Ok(plan) => {
            println!(
                "✓ Config valid: {} CPU(s), critical limit {}°C, interval {}ms",
                plan.cpu_count(),
                plan.critical_temperature,
                plan.interval.as_millis()
            );
            Some(plan)
        }
        Err(e) => {
            println!("✗ Config invalid: {}", e);
            all_ok = false;
            None
        }
    };

    let tool_path = resolve_tool_path(&config.ipmi);
    let tool_found = tool_path.exists();
    if tool_found {
        println!("✓ ipmitool: {}", tool_path.display());
    } else {
        println!("✗ ipmitool: {} NOT FOUND", tool_path.display());
        println!("  Install ipmitool or set ipmi.tool_path");
        all_ok = false;
    }

    #[cfg(target_os = "linux")]
    {
        use crate::daemon::systemd::{has_systemd, is_service_enabled, is_service_installed};
        if has_systemd() {
            if !is_service_installed() {
                println!("- Systemd service: not installed (optional: sudo ./ipmi-silencer --install-service)");
            } else if is_service_enabled() {
                println!("✓ Systemd service: Installed and enabled");
            } else {
                println!("⚠ Systemd service: Installed but NOT enabled");
            }
        } else {
            println!("- Systemd: Not available on this system");
        }
    }

    if let (Some(plan), true) = (plan, tool_found) {
        let channel = open_channel(&config.ipmi, plan.retry, false);
        match channel.execute(MC_INFO, &CancellationToken::new()).await {
            Ok(output) if output.is_accepted() => {
                let device = output
                    .stdout
                    .lines()
                    .find(|line| line.starts_with("Manufacturer Name") || line.starts_with("Product Name"))
                    .unwrap_or("responded");
                println!("✓ BMC check: {}", device.trim());
            }
            Ok(output) => {
                println!("✗ BMC check rejected: {}", output.stderr.trim());
                all_ok = false;
            }
            Err(e) => {
                println!("✗ BMC check failed: {}", e);
                all_ok = false;
            }
        }
    } else {
        println!("- BMC check: skipped");
    }

    println!();
    if all_ok {
        println!("\x1b[32m✓ All checks passed!\x1b[0m");
    } else {
        println!("\x1b[33m⚠ Some issues found - see above\x1b[0m");
    }

    Ok(all_ok)
}
