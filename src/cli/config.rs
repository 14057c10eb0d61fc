use crate::cli::ConfigAction;
use crate::config::AutocompleteConfig;
use crate::console::console;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// `override_path` is the global `--config` file; without it the default
/// location is used.
pub fn handle_config(
    action: ConfigAction,
    config: &AutocompleteConfig,
    override_path: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered = config
                .to_toml_string()
                .context("Failed to render configuration")?;
            console().plain(rendered.trim_end());
        }
        ConfigAction::Path => {
            let path = target_path(override_path)?;
            console().plain(&path.display().to_string());
        }
        ConfigAction::Set { key, value } => {
            let path = target_path(override_path)?;
            set_value(&path, &key, value)?;
            console().success("Configuration updated successfully");
        }
    }
    Ok(())
}

fn target_path(override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(AutocompleteConfig::config_path()?),
    }
}

fn set_value(path: &Path, key: &str, value: String) -> anyhow::Result<()> {
    let mut config = if path.exists() {
        AutocompleteConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        AutocompleteConfig::default()
    };
    config
        .update_setting(key, value)
        .with_context(|| format!("Cannot set '{}'", key))?;
    config
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
