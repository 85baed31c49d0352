use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::scoring::{find_template, template_names, Bid};

const HEADER: &str = "\
# bid-scorer configuration
#
# `scoring` holds the full policy. Delete it and set `template: <name>`
# to use a bundled preset instead (`bid-scorer templates` lists them).
# `bidders` is used when no bid file is passed on the command line.
";

/// Render a starter config built from the named template.
pub fn render_starter_config(template: &str) -> Result<String> {
    let preset = find_template(template).with_context(|| {
        format!(
            "Unknown template '{}'. Available: {}",
            template,
            template_names().join(", ")
        )
    })?;

    let config = Config {
        template: None,
        scoring: Some(preset.config()),
        bidders: vec![
            Bid::new("Bidder A", 1_000_000.0),
            Bid::new("Bidder B", 1_050_000.0),
            Bid::new("Bidder C", 980_000.0),
        ],
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize starter config")?;

    Ok(format!("{}# template: {}\n\n{}", HEADER, preset.name, yaml))
}

/// Write a starter config file to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set. The parent
/// directory is created if needed and the write is atomic.
pub fn write_starter_config(path: &Path, template: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    let content = render_starter_config(template)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    info!(path = %path.display(), template, "starter config written");
    Ok(())
}
