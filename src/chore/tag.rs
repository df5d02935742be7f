//! Chore tags inside task descriptions

use crate::grocy::ChoreId;
use crate::task::Task;

/// Prefix of the tag linking a task to a Grocy chore
pub const CHORE_TAG_PREFIX: &str = "chore:";

/// Marks a chore whose executions are tracked by another integration
pub const AUTO_MARKER: &str = "+auto";

/// A task's link to a Grocy chore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoreBinding {
    pub chore: ChoreId,
    pub auto: bool,
}

impl ChoreBinding {
    /// Find the first valid `chore:<id>` tag. Malformed tags are ignored,
    /// so a description without a valid tag simply has no binding.
    pub fn from_description(description: &str) -> Option<Self> {
        let chore = description
            .split_whitespace()
            .filter_map(|word| word.strip_prefix(CHORE_TAG_PREFIX))
            .find_map(ChoreId::parse)?;
        let auto = description.split_whitespace().any(|word| word == AUTO_MARKER);
        Some(Self { chore, auto })
    }

    pub fn of(task: &Task) -> Option<Self> {
        Self::from_description(&task.description)
    }
}
