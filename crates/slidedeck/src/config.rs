use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::theme::{THEME_NAMES, Theme};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidedeck";
pub const DEFAULT_PRINT_OUTPUT: &str = "slidedeck-print.png";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<PrintConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    /// Where the print capture is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the user config. A missing file yields the defaults; a file that
    /// cannot be read or parsed is an error.
    pub fn load_if_exists() -> Result<Self> {
        let path = Self::path()?;
        Self::load_if_exists_from(&path)
    }

    pub fn load_if_exists_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_yaml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!("Failed to read config: {e}")),
        }
    }

    /// Config for presenting. Problems with the file are reported and the
    /// defaults are used instead.
    pub fn load_or_default() -> Self {
        match Self::load_if_exists() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, format!("# slidedeck configuration\n{yaml}"))?;
        Ok(())
    }

    pub fn default_theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    pub fn print_output(&self) -> PathBuf {
        self.print
            .as_ref()
            .and_then(|p| p.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRINT_OUTPUT))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                if Theme::by_name(value).is_none() {
                    anyhow::bail!(
                        "Invalid theme: {value}. Must be one of: {}.",
                        THEME_NAMES.join(", ")
                    );
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let slide = match value.parse::<usize>() {
                    Ok(n) if n >= 1 => n,
                    _ => anyhow::bail!(
                        "Invalid start_slide: {value}. Must be a slide number starting at 1."
                    ),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(slide);
            }
            "print.output" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid print.output: path must not be empty.");
                }
                self.print.get_or_insert_with(PrintConfig::default).output =
                    Some(PathBuf::from(value));
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.theme, defaults.start_slide, print.output"
            ),
        }
        Ok(())
    }
}
