//! xtask - Development tasks for grocy-todo

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grocy_todo::config::{Config, GrocySection, TodoConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for grocy-todo")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CLI documentation from clap definitions
    GenDocs,

    /// Write an example config.toml to docs/
    GenSampleConfig,
}

fn main() -> Result<()> {
    let args = Xtask::parse();
    match args.command {
        Commands::GenDocs => generate_cli_docs(),
        Commands::GenSampleConfig => generate_sample_config(),
    }
}

fn docs_dir() -> Result<&'static Path> {
    let dir = Path::new("docs");
    fs::create_dir_all(dir).context("Failed to create docs directory")?;
    Ok(dir)
}

fn generate_cli_docs() -> Result<()> {
    let markdown = clap_markdown::help_markdown::<grocy_todo::cli::Cli>();

    let output_path = docs_dir()?.join("cli.md");
    fs::write(&output_path, markdown).context("Failed to write CLI reference")?;

    println!("Generated CLI documentation at {}", output_path.display());
    Ok(())
}

fn generate_sample_config() -> Result<()> {
    let sample = Config {
        grocy: Some(GrocySection {
            base_url: Some("https://grocy.example/api".to_string()),
            api_key: Some("your-api-key".to_string()),
            timeout_secs: 30,
        }),
        todo: TodoConfig {
            file: Some(PathBuf::from("/home/me/todo.txt")),
        },
    };

    let output_path = docs_dir()?.join("config.example.toml");
    fs::write(&output_path, toml::to_string_pretty(&sample)?)
        .context("Failed to write sample config")?;

    println!("Generated sample config at {}", output_path.display());
    Ok(())
}
