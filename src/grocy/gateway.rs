//! The remote side of chore syncing
//!
//! [`ChoreGateway`] is everything the sync engine needs from Grocy: list the
//! chores, and record an execution or a skip for one of them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

use crate::chore::CHORE_TAG_PREFIX;

/// Grocy's numeric chore id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChoreId(pub u32);

impl ChoreId {
    /// Parse a chore id; only plain decimal digits are accepted
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().map(Self)
    }
}

impl fmt::Display for ChoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chore as reported by Grocy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreRecord {
    pub id: ChoreId,
    pub name: String,
    /// Whether the chore is due at the time it was listed
    #[serde(default)]
    pub due_now: bool,
    #[serde(default)]
    pub next_estimated_execution: Option<NaiveDateTime>,
}

impl ChoreRecord {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ChoreId(id),
            name: name.into(),
            due_now: true,
            next_estimated_execution: None,
        }
    }

    /// The todo.txt description for this chore: `<name> chore:<id>`.
    ///
    /// The name is collapsed onto one line, and `chore:` tokens inside it are
    /// dropped so the task binds to this chore only.
    pub fn task_description(&self) -> String {
        let tag = format!("{}{}", CHORE_TAG_PREFIX, self.id);
        self.name
            .split_whitespace()
            .filter(|word| !word.starts_with(CHORE_TAG_PREFIX))
            .chain(std::iter::once(tag.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An error reported by, or on the way to, the chore service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status, `None` if no response was received
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "Grocy returned HTTP {}: {}", status, self.message),
            None => write!(f, "Could not reach Grocy: {}", self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Chore listing and completion capabilities of the remote service.
///
/// Calls are awaited one at a time by the sync engine; implementations do
/// not need to support concurrent use.
pub trait ChoreGateway {
    /// List chores. With `include_all == false` only chores that are due now.
    fn list_chores(
        &self,
        include_all: bool,
    ) -> impl Future<Output = Result<Vec<ChoreRecord>, RemoteError>> + Send;

    /// Record an execution of chore `id`, at `at` or now if `None`.
    fn execute_chore(
        &self,
        id: ChoreId,
        at: Option<NaiveDateTime>,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Skip the current occurrence of chore `id`, rescheduling it without
    /// recording an execution.
    fn skip_chore(&self, id: ChoreId) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
