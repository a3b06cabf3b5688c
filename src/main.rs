//! ipmi-silencer entry point: CLI dispatch, signal handlers, async runtime.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use ipmi_silencer::app::cli::{Args, HELP_TEXT};
use ipmi_silencer::app::logging::{init_tracing, level_filter, reload_level};
use ipmi_silencer::config::persistence::{load_config, read_config, redacted_json, resolve_config_path, save_config};
use ipmi_silencer::config::types::{AgentConfig, LogFormat};
use ipmi_silencer::config::ControlPlan;
use ipmi_silencer::daemon::status::run_health_check;
use ipmi_silencer::daemon::FanController;
use ipmi_silencer::system::open_channel;

#[cfg(target_os = "linux")]
use ipmi_silencer::daemon::systemd::{install_systemd_service, uninstall_systemd_service};

#[tokio::main]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if err.kind() == clap::error::ErrorKind::DisplayHelp {
                print!("{}", HELP_TEXT);
                std::process::exit(0);
            }
            if err.kind() == clap::error::ErrorKind::DisplayVersion {
                println!("\x1b[32mipmi-silencer {} ({})\x1b[0m", env!("CARGO_PKG_VERSION"), std::env::consts::ARCH);
                std::process::exit(0);
            }

            eprintln!("{}", err);
            eprintln!();
            print!("{}", HELP_TEXT);
            std::process::exit(1);
        }
    };

    let config_path = resolve_config_path(args.config.as_deref())?;

    // Management commands run before logging is set up
    #[cfg(target_os = "linux")]
    if args.install_service {
        return install_systemd_service(&config_path);
    }

    #[cfg(target_os = "linux")]
    if args.uninstall_service {
        return uninstall_systemd_service();
    }

    #[cfg(not(target_os = "linux"))]
    if args.install_service || args.uninstall_service {
        anyhow::bail!("Service management is only supported on Linux with systemd");
    }

    if args.init_config {
        if config_path.exists() {
            anyhow::bail!("Refusing to overwrite existing config file {:?}", config_path);
        }
        return save_config(&AgentConfig::default(), &config_path).await;
    }

    if args.print_config {
        let config = load_config(&config_path).await?;
        println!("{}", redacted_json(&config)?);
        return Ok(());
    }

    if args.check {
        let healthy = run_health_check(&config_path).await?;
        std::process::exit(if healthy { 0 } else { 1 });
    }

    // Read once, before logging exists, so the file's level and format can take effect.
    // A broken file is reported after the subscriber is up.
    let file_config = read_config(&config_path).await;
    let logging = file_config.as_ref().ok().and_then(|c| c.as_ref()).map(|c| &c.logging);

    // Priority: 1. --log-level flag, 2. LOG_LEVEL env, 3. config file, 4. default (info)
    let requested_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .or_else(|| logging.map(|l| l.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let filter = level_filter(&requested_level).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}'. Using INFO. Valid levels: TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL",
            requested_level
        );
        "info"
    });
    let format = args
        .log_format
        .map(LogFormat::from)
        .or_else(|| logging.map(|l| l.format))
        .unwrap_or(LogFormat::Text);

    init_tracing(filter, format);

    info!("ipmi-silencer v{} starting ({})", env!("CARGO_PKG_VERSION"), std::env::consts::OS);

    let config = match file_config {
        Ok(Some(config)) => {
            info!("Loaded configuration from: {:?}", config_path);
            config
        }
        Ok(None) => {
            info!("Config file {:?} not found, using built-in defaults", config_path);
            AgentConfig::default()
        }
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };
    let plan = match ControlPlan::from_config(&config) {
        Ok(plan) => plan,
        Err(e) => {
            error!("Configuration rejected: {}", e);
            return Err(e.into());
        }
    };

    if args.dry_run {
        warn!("Dry run: fan commands will be logged, not sent");
    }

    let channel = Arc::new(open_channel(&config.ipmi, plan.retry.clone(), args.dry_run));
    let mut controller = FanController::new(plan, Arc::clone(&channel));

    if args.once {
        let report = controller.run_cycle(&CancellationToken::new()).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    #[cfg(unix)]
    spawn_sighup_handler(config_path.clone(), args.log_level.is_some());

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received (Ctrl+C)");
        shutdown.cancel();
    });
    #[cfg(unix)]
    spawn_sigterm_handler(cancel.clone());

    controller.run(cancel).await;

    if config.control.restore_automatic_on_exit {
        // A second Ctrl+C abandons the restore
        let restore_cancel = CancellationToken::new();
        let abandon = restore_cancel.clone();
        let second_signal = tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            warn!("Second shutdown signal received, abandoning fan control restore");
            abandon.cancel();
        });

        match controller.restore_automatic(&restore_cancel).await {
            Ok(true) => info!("Fan control handed back to the BMC"),
            Ok(false) => warn!("BMC refused automatic fan control on exit"),
            Err(e) => error!("Failed to restore automatic fan control: {}", e),
        }
        second_signal.abort();
    }

    let stats = channel.stats();
    info!("ipmitool attempts: {}, retries: {}", stats.attempts, stats.retries);
    info!("ipmi-silencer shutdown complete");
    Ok(())
}

/// SIGHUP re-reads the config file and applies its log level. A `--log-level` flag pins the
/// level for the life of the process.
#[cfg(unix)]
fn spawn_sighup_handler(config_path: std::path::PathBuf, level_pinned: bool) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(sighup) => sighup,
        Err(e) => {
            warn!("Failed to set up SIGHUP handler: {}", e);
            return;
        }
    };

    tokio::spawn(async move {
        while sighup.recv().await.is_some() {
            info!("SIGHUP received, reloading log level configuration");
            if level_pinned {
                info!("Log level set on the command line, ignoring config file");
                continue;
            }
            reload_from(&config_path).await;
        }
    });
}

#[cfg(unix)]
async fn reload_from(config_path: &std::path::Path) {
    match load_config(config_path).await {
        Ok(new_config) => {
            let filter = level_filter(&new_config.logging.level).unwrap_or("info");
            match reload_level(filter) {
                Ok(()) => info!("Log level reloaded: {}", filter.to_uppercase()),
                Err(e) => error!("Failed to reload log level: {}", e),
            }
        }
        Err(e) => error!("Failed to reload config: {:#}", e),
    }
}

#[cfg(unix)]
fn spawn_sigterm_handler(cancel: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::spawn(async move {
                sigterm.recv().await;
                info!("Shutdown signal received (SIGTERM)");
                cancel.cancel();
            });
        }
        Err(e) => warn!("Failed to set up SIGTERM handler: {}", e),
    }
}
