use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process;

use crate::daemon::{SERVICE_NAME, SYSTEMD_SERVICE_PATH, SYSTEMD_SERVICE_TEMPLATE};

/// Check if systemd is available on this system
pub fn has_systemd() -> bool {
    Path::new("/run/systemd/system").exists()
}

pub fn is_service_installed() -> bool {
    Path::new(SYSTEMD_SERVICE_PATH).exists()
}

pub fn is_service_enabled() -> bool {
    process::Command::new("systemctl")
        .args(["is-enabled", "--quiet", SERVICE_NAME])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Unit file text for this executable and config file.
pub fn render_service_unit(exe_path: &Path, config_path: &Path) -> Result<String> {
    let work_dir = exe_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine executable directory"))?;

    Ok(SYSTEMD_SERVICE_TEMPLATE
        .replace("{{EXEC_PATH}}", &exe_path.display().to_string())
        .replace("{{CONFIG_PATH}}", &config_path.display().to_string())
        .replace("{{WORK_DIR}}", &work_dir.display().to_string()))
}

fn require_root(flag: &str) -> Result<()> {
    #[cfg(unix)]
    if unsafe { libc::geteuid() } != 0 {
        return Err(anyhow::anyhow!(
            "Root privileges required. Run with: sudo ./ipmi-silencer {}",
            flag
        ));
    }
    #[cfg(not(unix))]
    let _ = flag;
    Ok(())
}

/// Install or repair the systemd unit (idempotent). The unit runs the daemon in the
/// foreground with the given config file.
pub fn install_systemd_service(config_path: &Path) -> Result<()> {
    require_root("--install-service")?;

    if !has_systemd() {
        println!("❌ systemd not detected on this system.");
        println!("   Run the daemon from your init system with: ipmi-silencer --config <path>");
        return Ok(());
    }

    let exe_path = std::env::current_exe()?;
    let config_path = if config_path.is_absolute() {
        config_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(config_path)
    };
    let service_content = render_service_unit(&exe_path, &config_path)?;

    let service_path = Path::new(SYSTEMD_SERVICE_PATH);
    if service_path.exists() {
        if let Ok(existing_content) = fs::read_to_string(service_path) {
            if existing_content == service_content {
                println!("✓ Service is already installed and up-to-date");
                return Ok(());
            }
        }
        println!("! Existing service file found - updating...");
    }

    fs::write(service_path, &service_content).context("Failed to write service file")?;
    println!("✓ Service file created: {}", SYSTEMD_SERVICE_PATH);

    match process::Command::new("systemctl").args(["daemon-reload"]).status() {
        Ok(status) if status.success() => println!("✓ Systemd daemon reloaded"),
        _ => println!("⚠ Failed to reload systemd daemon (run: systemctl daemon-reload)"),
    }

    let unit = format!("{}.service", SERVICE_NAME);
    match process::Command::new("systemctl").args(["enable", unit.as_str()]).status() {
        Ok(status) if status.success() => println!("✓ Service enabled (will start on boot)"),
        _ => println!("⚠ Failed to enable service (run: systemctl enable {})", unit),
    }

    println!();
    println!("Start now with: sudo systemctl start {}", SERVICE_NAME);

    Ok(())
}

pub fn uninstall_systemd_service() -> Result<()> {
    require_root("--uninstall-service")?;

    if !has_systemd() {
        println!("❌ systemd not detected on this system.");
        return Ok(());
    }

    let service_path = Path::new(SYSTEMD_SERVICE_PATH);
    if !service_path.exists() {
        println!("✓ Service is not installed");
        return Ok(());
    }

    let _ = process::Command::new("systemctl").args(["stop", SERVICE_NAME]).status();
    println!("✓ Service stopped");

    let _ = process::Command::new("systemctl").args(["disable", SERVICE_NAME]).status();
    println!("✓ Service disabled");

    fs::remove_file(service_path)?;
    println!("✓ Service file removed");

    let _ = process::Command::new("systemctl").args(["daemon-reload"]).status();
    println!("✓ Systemd daemon reloaded");

    Ok(())
}
