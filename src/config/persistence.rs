//! Config file load and save.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::types::AgentConfig;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// `--config` wins, otherwise `config.json` next to the executable.
pub fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = path {
        return Ok(p.to_path_buf());
    }
    let exe_dir = std::env::current_exe()?
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine executable directory"))?
        .to_path_buf();
    Ok(exe_dir.join(CONFIG_FILE_NAME))
}

/// A missing file is not an error: the built-in defaults describe the stock chassis.
pub async fn load_config(config_path: &Path) -> Result<AgentConfig> {
    match read_config(config_path).await? {
        Some(config) => {
            info!("Loaded configuration from: {:?}", config_path);
            Ok(config)
        }
        None => {
            info!("Config file {:?} not found, using built-in defaults", config_path);
            Ok(AgentConfig::default())
        }
    }
}

/// Reads and parses without logging, for use before the subscriber exists.
/// `None` when the file is absent.
pub async fn read_config(config_path: &Path) -> Result<Option<AgentConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(config_path)
        .await
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;
    let config: AgentConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", config_path))?;
    Ok(Some(config))
}

pub async fn save_config(config: &AgentConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write config file {:?}", path))?;
    info!("Configuration saved to: {:?}", path);
    Ok(())
}

/// JSON rendering for `--print-config`. The BMC password never leaves the process.
pub fn redacted_json(config: &AgentConfig) -> Result<String> {
    let mut shown = config.clone();
    if !shown.ipmi.password.is_empty() {
        shown.ipmi.password = "********".to_string();
    }
    Ok(serde_json::to_string_pretty(&shown)?)
}
