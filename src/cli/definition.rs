//! Command-line definitions

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::chore::ChoreCommands;

#[derive(Parser)]
#[command(name = "grocy-todo")]
#[command(version)]
#[command(about = "Sync Grocy chores with a todo.txt task list")]
pub struct Cli {
    /// Perform a trial run with no changes made
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to the config file
    #[arg(long, global = true, env = "GROCY_TODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the todo.txt file
    #[arg(long, global = true, env = "TODO_FILE")]
    pub file: Option<PathBuf>,

    /// Grocy API base URL, e.g. https://grocy.example/api
    #[arg(long, global = true, env = "GROCY_BASE_URL")]
    pub base_url: Option<String>,

    /// Grocy API key
    #[arg(long, global = true, env = "GROCY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync chores between Grocy and the task list
    Chore {
        #[command(subcommand)]
        command: ChoreCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
