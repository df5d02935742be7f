//! CLI command implementations

pub mod chore;
pub mod definition;

pub use definition::{Cli, Commands};

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::config::{default_config_path, Config, Overrides};
use crate::grocy::GrocyClient;
use crate::task::TodoTxtStore;

/// Configuration resolved from the config file and the command line
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub config_path: PathBuf,
    pub overrides: Overrides,
    pub dry_run: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        debug!("Using config {:?}", config_path);
        let config = Config::load_from(&config_path)?;

        Ok(Self {
            config,
            config_path,
            overrides: Overrides {
                base_url: cli.base_url.clone(),
                api_key: cli.api_key.clone(),
                todo_file: cli.file.clone(),
            },
            dry_run: cli.dry_run,
        })
    }

    pub fn grocy_client(&self) -> Result<GrocyClient> {
        let grocy = self.config.grocy(&self.overrides, &self.config_path)?;
        Ok(GrocyClient::new(&grocy, self.dry_run)?)
    }

    pub fn store(&self) -> TodoTxtStore {
        TodoTxtStore::new(self.config.todo_file(&self.overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_settings_from_cli() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"[grocy]\nbase_url = \"http://grocy.local/api\"\napi_key = \"k\"\n[todo]\nfile = \"/tmp/from-config.txt\"\n")?;

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "grocy-todo",
            "--config",
            path.as_str(),
            "--file",
            "/tmp/from-flag.txt",
            "--dry-run",
            "chore",
            "list",
        ])?;
        let settings = Settings::from_cli(&cli)?;

        assert!(settings.dry_run);
        assert_eq!(settings.store().path(), PathBuf::from("/tmp/from-flag.txt"));
        assert!(settings.grocy_client()?.is_dry_run());
        Ok(())
    }
}
