//! grocy-todo - Sync Grocy chores with a todo.txt task list

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use grocy_todo::cli::{self, Cli, Commands, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if std::env::var("GROCY_TODO_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("grocy_todo=debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Completions need neither config nor network.
    if let Commands::Completion { shell } = cli.command {
        generate(shell, &mut Cli::command(), "grocy-todo", &mut std::io::stdout());
        return Ok(());
    }

    let settings = Settings::from_cli(&cli)?;

    match cli.command {
        Commands::Chore { command } => cli::chore::run(&settings, command).await,
        Commands::Completion { .. } => Ok(()),
    }
}
