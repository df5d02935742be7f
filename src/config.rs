//! User configuration management

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "grocy-todo";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grocy: Option<GrocySection>,

    #[serde(default)]
    pub todo: TodoConfig,
}

/// `[grocy]` as written in the file; every key may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrocySection {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Everything needed to talk to a Grocy instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrocyConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Values given on the command line or in the environment; they win over
/// the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub todo_file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// `<config dir>/grocy-todo/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not find config directory")?;
    Ok(dir.join(APP_DIR_NAME).join("config.toml"))
}

impl Config {
    /// Load from `path`; a missing file yields the default config
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Combine the `[grocy]` section with overrides. Both URL and API key are
    /// required; `path` is only used for the error message.
    pub fn grocy(&self, overrides: &Overrides, path: &Path) -> Result<GrocyConfig> {
        let section = self.grocy.clone().unwrap_or_else(|| GrocySection {
            timeout_secs: default_timeout_secs(),
            ..GrocySection::default()
        });

        let base_url = overrides.base_url.clone().or(section.base_url);
        let api_key = overrides.api_key.clone().or(section.api_key);

        match (base_url, api_key) {
            (Some(base_url), Some(api_key)) if !base_url.is_empty() && !api_key.is_empty() => {
                Ok(GrocyConfig {
                    base_url,
                    api_key,
                    timeout_secs: section.timeout_secs,
                })
            }
            _ => bail!(
                "Config file '{}' is missing or incomplete.",
                path.display()
            ),
        }
    }

    /// The todo.txt file to operate on: override, then config, then `~/todo.txt`
    pub fn todo_file(&self, overrides: &Overrides) -> PathBuf {
        overrides
            .todo_file
            .clone()
            .or_else(|| self.todo.file.clone())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join("todo.txt"))
                    .unwrap_or_else(|| PathBuf::from("todo.txt"))
            })
    }
}
