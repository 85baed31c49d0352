pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::scoring::{find_template, template_names, ScoringConfig};

/// Get the config directory path (~/.config/bid-scorer/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("bid-scorer"))
}

/// Get the default config file path (~/.config/bid-scorer/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path
///   (~/.config/bid-scorer/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path yields an empty config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(path = %config_path.display(), "no config file, using empty config");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

impl Config {
    /// Scoring policy to use: an explicit template override, then the
    /// `scoring` section, then the `template` named in the file.
    pub fn effective_scoring(&self, template_override: Option<&str>) -> Result<ScoringConfig> {
        if let Some(name) = template_override {
            return resolve_template(name);
        }
        if let Some(ref scoring) = self.scoring {
            return Ok(scoring.clone());
        }
        if let Some(ref name) = self.template {
            return resolve_template(name);
        }
        anyhow::bail!(
            "No scoring configured. Add a `scoring:` or `template:` section, run `bid-scorer init`, or pass --template"
        )
    }
}

fn resolve_template(name: &str) -> Result<ScoringConfig> {
    find_template(name).map(|t| t.config()).with_context(|| {
        format!(
            "Unknown template '{}'. Available: {}",
            name,
            template_names().join(", ")
        )
    })
}
