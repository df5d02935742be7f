//! `grocy-todo chore` command implementations

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::{self, BufRead, Write};

use super::Settings;
use crate::chore::{self, ChoreError};
use crate::grocy::{ChoreGateway, ChoreId};
use crate::task::{Task, TaskStore};

#[derive(Subcommand)]
pub enum ChoreCommands {
    /// List chores in todo.txt format
    List(ChoreListArgs),

    /// Replace the chore tasks in the task list with the current chores
    Pull(ChorePullArgs),

    /// Send completed chore tasks to Grocy
    Push,

    /// Remove all open chore tasks from the task list
    Drop,

    /// Mark a chore as done right now
    Done(ChoreDoneArgs),

    /// Ask about each due chore and mark the confirmed ones as done
    Prompt,
}

#[derive(Args)]
pub struct ChoreListArgs {
    /// Include chores that are not due yet
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ChorePullArgs {
    /// Include chores that are not due yet
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ChoreDoneArgs {
    /// Grocy chore ID
    pub id: u32,
}

pub async fn run(settings: &Settings, command: ChoreCommands) -> Result<()> {
    match command {
        ChoreCommands::List(args) => run_list(settings, args).await,
        ChoreCommands::Pull(args) => run_pull(settings, args).await,
        ChoreCommands::Push => run_push(settings).await,
        ChoreCommands::Drop => run_drop(settings),
        ChoreCommands::Done(args) => run_done(settings, args).await,
        ChoreCommands::Prompt => run_prompt(settings).await,
    }
}

async fn run_list(settings: &Settings, args: ChoreListArgs) -> Result<()> {
    let grocy = settings.grocy_client()?;
    for line in chore::list(&grocy, args.all).await? {
        println!("{}", line);
    }
    Ok(())
}

async fn run_pull(settings: &Settings, args: ChorePullArgs) -> Result<()> {
    let grocy = settings.grocy_client()?;
    let store = settings.store();

    let tasks = load(&store)?;
    let pulled = chore::pull(&grocy, tasks, args.all).await?;
    save(settings, &store, &pulled.tasks)?;

    for line in &pulled.lines {
        println!("{}", line);
    }
    Ok(())
}

async fn run_push(settings: &Settings) -> Result<()> {
    let grocy = settings.grocy_client()?;
    let tasks = load(&settings.store())?;

    match chore::push(&grocy, &tasks).await {
        Ok(report) => {
            for line in report.lines() {
                println!("{}", remote_effect(settings.dry_run, &line));
            }
            Ok(())
        }
        Err(err) => {
            if let ChoreError::PushAborted {
                done,
                not_attempted,
                ..
            } = &err
            {
                for line in done.iter().filter_map(|outcome| outcome.line()) {
                    println!("{}", remote_effect(settings.dry_run, &line));
                }
                if !not_attempted.is_empty() {
                    eprintln!("Not attempted: {}", join_ids(not_attempted));
                }
            }
            Err(err.into())
        }
    }
}

fn run_drop(settings: &Settings) -> Result<()> {
    let store = settings.store();
    let tasks = load(&store)?;
    let before = tasks.len();

    let kept = chore::drop_chores(tasks)?;
    save(settings, &store, &kept)?;

    println!("Removed {} chore tasks", before - kept.len());
    Ok(())
}

async fn run_done(settings: &Settings, args: ChoreDoneArgs) -> Result<()> {
    let grocy = settings.grocy_client()?;
    let line = chore::mark_done(&grocy, ChoreId(args.id)).await?;
    println!("{}", remote_effect(settings.dry_run, &line));
    Ok(())
}

async fn run_prompt(settings: &Settings) -> Result<()> {
    let grocy = settings.grocy_client()?;
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    prompt_due(&grocy, settings.dry_run, &mut input, &mut output).await?;
    Ok(())
}

/// Ask `Completed <name>? [y/n]` for every due chore and execute the
/// confirmed ones now. Stops quietly when `input` runs out.
async fn prompt_due<G: ChoreGateway>(
    gateway: &G,
    dry_run: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Vec<ChoreId>> {
    let chores = gateway.list_chores(false).await.map_err(ChoreError::from)?;

    let mut executed = Vec::new();
    for record in chores {
        write!(output, "Completed {}? [y/n] ", record.name)?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            break;
        }
        if !agrees(&answer) {
            continue;
        }

        let line = chore::mark_done(gateway, record.id).await?;
        writeln!(output, "{}", remote_effect(dry_run, &line))?;
        executed.push(record.id);
    }
    Ok(executed)
}

fn agrees(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Output line for a Grocy call, marked when nothing was actually sent
fn remote_effect(dry_run: bool, line: &str) -> String {
    if dry_run {
        format!("Dry run: {}", line)
    } else {
        line.to_string()
    }
}

fn load(store: &impl TaskStore) -> chore::Result<Vec<Task>> {
    Ok(store.load()?)
}

fn save(settings: &Settings, store: &impl TaskStore, tasks: &[Task]) -> chore::Result<()> {
    if settings.dry_run {
        eprintln!("Dry run: task list not written");
        return Ok(());
    }
    Ok(store.save(tasks)?)
}

fn join_ids(ids: &[ChoreId]) -> String {
    ids.iter()
        .map(|id| format!("chore:{}", id))
        .collect::<Vec<_>>()
        .join(", ")
}
