mod error;

pub use error::{ConfigError, ConfigResult};

use crate::console::VerbosityLevel;
use crate::matcher::Trigger;
use crate::menu::ClassNames;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_TRIGGER: &str = r"@(\w*)$";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AutocompleteConfig {
    #[serde(default = "default_trigger")]
    pub trigger: String,
    #[serde(default)]
    pub verbosity: Option<String>,
    #[serde(default)]
    pub classes: ClassNames,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_string()
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            verbosity: None,
            classes: ClassNames::default(),
        }
    }
}

impl AutocompleteConfig {
    /// Loads the user config file, falling back to defaults when it does not exist.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Checks everything that can be checked without a surface: the trigger
    /// compiles and the verbosity, if set, is a known level.
    pub fn validate(&self) -> ConfigResult<()> {
        self.trigger()?;
        if let Some(verbosity) = &self.verbosity
            && verbosity.parse::<VerbosityLevel>().is_err()
        {
            return Err(ConfigError::InvalidValue {
                field: "verbosity".to_string(),
                value: verbosity.clone(),
            });
        }
        Ok(())
    }

    /// Sets one key, validating the value first. Class names are addressed
    /// as `classes.<name>`.
    pub fn update_setting(&mut self, key: &str, value: String) -> ConfigResult<()> {
        match key {
            "trigger" => {
                Trigger::new(&value)?;
                self.trigger = value;
            }
            "verbosity" => {
                let level = value
                    .parse::<VerbosityLevel>()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: value.clone(),
                    })?;
                self.set_verbosity(level);
            }
            "classes.hidden" => self.classes.hidden = value,
            "classes.menu" => self.classes.menu = value,
            "classes.option" => self.classes.option = value,
            "classes.highlighted" => self.classes.highlighted = value,
            "classes.id_attribute" => self.classes.id_attribute = value,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn trigger(&self) -> ConfigResult<Trigger> {
        Trigger::new(&self.trigger)
    }

    /// Get the configured verbosity level, falling back to Normal if not set
    pub fn get_verbosity(&self) -> VerbosityLevel {
        self.verbosity
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(VerbosityLevel::Normal)
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = Some(verbosity.to_string());
    }

    pub fn config_path() -> ConfigResult<PathBuf> {
        let path = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ConfigError::NoHomeDirectory)?;
        let mut path = PathBuf::from(path);
        path.push(".config");
        path.push("textcomplete");
        path.push("config.toml");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
