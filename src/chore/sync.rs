//! Chore reconciliation between Grocy and the task list
//!
//! Grocy owns which chores exist and when they are due; the task list owns
//! what the user has done about them. A completed task that still carries a
//! chore tag is the only record of that completion until it has been pushed,
//! so nothing here ever rewrites the list while such a task exists.

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use super::error::{ChoreError, Result};
use super::tag::ChoreBinding;
use crate::grocy::{ChoreGateway, ChoreId, ChoreRecord};
use crate::task::Task;

/// Display lines for listed chores, `<name> chore:<id>`. Consumed once.
#[derive(Debug)]
pub struct ChoreLines(std::vec::IntoIter<ChoreRecord>);

impl Iterator for ChoreLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.0.next().map(|chore| chore_task(&chore).to_line())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// Result of [`pull`]: the replacement list and the lines that were added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulled {
    pub tasks: Vec<Task>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushAction {
    Executed { at: Option<NaiveDateTime> },
    Skipped,
    /// Recorded in Grocy by another integration; nothing was sent
    AutoTracked,
}

/// What happened to one completed chore task during [`push`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub chore: ChoreId,
    pub action: PushAction,
    pub description: String,
}

impl PushOutcome {
    /// Output line, only for outcomes that made a Grocy call
    pub fn line(&self) -> Option<String> {
        match self.action {
            PushAction::Executed { .. } => {
                Some(format!("Executed chore {}: {}", self.chore, self.description))
            }
            PushAction::Skipped => Some(format!("Skipped chore {}: {}", self.chore, self.description)),
            PushAction::AutoTracked => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub outcomes: Vec<PushOutcome>,
}

impl PushReport {
    pub fn lines(&self) -> Vec<String> {
        self.outcomes.iter().filter_map(PushOutcome::line).collect()
    }
}

/// Smallest chore id among completed, chore-tagged tasks
pub fn pending_completion(tasks: &[Task]) -> Option<ChoreId> {
    tasks
        .iter()
        .filter(|task| task.completed)
        .filter_map(ChoreBinding::of)
        .map(|binding| binding.chore)
        .min()
}

fn ensure_nothing_pending(tasks: &[Task]) -> Result<()> {
    match pending_completion(tasks) {
        Some(chore) => Err(ChoreError::PendingCompletion { chore }),
        None => Ok(()),
    }
}

/// The new active task standing for `chore`
fn chore_task(chore: &ChoreRecord) -> Task {
    Task::new(chore.task_description())
}

fn is_active_chore(task: &Task) -> bool {
    !task.completed && ChoreBinding::of(task).is_some()
}

/// List chores from Grocy, all of them or only those due now
pub async fn list<G: ChoreGateway>(gateway: &G, include_all: bool) -> Result<ChoreLines> {
    let chores = gateway.list_chores(include_all).await?;
    Ok(ChoreLines(chores.into_iter()))
}

/// Replace the active chore tasks in `tasks` with the current Grocy chores.
///
/// Tasks without a chore tag keep their order and come first; one new task
/// per chore follows, in the order Grocy listed them.
pub async fn pull<G: ChoreGateway>(gateway: &G, tasks: Vec<Task>, include_all: bool) -> Result<Pulled> {
    ensure_nothing_pending(&tasks)?;

    let before = tasks.len();
    let mut kept: Vec<Task> = tasks.into_iter().filter(|t| !is_active_chore(t)).collect();
    debug!("Superseding {} active chore tasks", before - kept.len());

    let chores = gateway.list_chores(include_all).await?;
    let added: Vec<Task> = chores.iter().map(chore_task).collect();
    let lines: Vec<String> = added.iter().map(Task::to_line).collect();
    kept.extend(added);

    info!("Pulled {} chores", lines.len());
    Ok(Pulled { tasks: kept, lines })
}

/// Report completed chore tasks to Grocy.
///
/// Tasks are handled in ascending chore id order. Priority `S` skips the
/// chore, `+auto` chores are left alone, everything else is executed at its
/// completion date. The task list is not modified. The first failing call
/// stops the push; the error lists what was already sent.
pub async fn push<G: ChoreGateway>(gateway: &G, tasks: &[Task]) -> Result<PushReport> {
    let mut pending: Vec<(ChoreBinding, &Task)> = tasks
        .iter()
        .filter(|task| task.completed)
        .filter_map(|task| ChoreBinding::of(task).map(|binding| (binding, task)))
        .collect();
    pending.sort_by_key(|(binding, _)| binding.chore);

    let mut done = Vec::with_capacity(pending.len());
    for (index, (binding, task)) in pending.iter().enumerate() {
        let skip = task.effective_priority().is_some_and(|p| p.is_skip());

        let result = if skip {
            info!("Skipping chore {}", binding.chore);
            gateway
                .skip_chore(binding.chore)
                .await
                .map(|()| PushAction::Skipped)
        } else if binding.auto {
            debug!("Chore {} is tracked automatically", binding.chore);
            Ok(PushAction::AutoTracked)
        } else {
            let at = task
                .completion_date
                .map(|date| date.and_time(NaiveTime::MIN));
            if at.is_none() {
                warn!(
                    "Chore {} is completed without a completion date, executing it now",
                    binding.chore
                );
            }
            info!("Executing chore {}", binding.chore);
            gateway
                .execute_chore(binding.chore, at)
                .await
                .map(|()| PushAction::Executed { at })
        };

        match result {
            Ok(action) => done.push(PushOutcome {
                chore: binding.chore,
                action,
                description: task.description.clone(),
            }),
            Err(source) => {
                return Err(ChoreError::PushAborted {
                    failed: binding.chore,
                    source,
                    done,
                    not_attempted: pending[index + 1..]
                        .iter()
                        .map(|(binding, _)| binding.chore)
                        .collect(),
                });
            }
        }
    }

    Ok(PushReport { outcomes: done })
}

/// Remove every active chore task, leaving everything else in order
pub fn drop_chores(tasks: Vec<Task>) -> Result<Vec<Task>> {
    ensure_nothing_pending(&tasks)?;
    let kept: Vec<Task> = tasks.into_iter().filter(|t| !is_active_chore(t)).collect();
    Ok(kept)
}

/// Execute one chore right now, without touching the task list
pub async fn mark_done<G: ChoreGateway>(gateway: &G, chore: ChoreId) -> Result<String> {
    info!("Executing chore {}", chore);
    gateway.execute_chore(chore, None).await?;
    Ok(format!("Executed chore {}", chore))
}
