//! Chore syncing between Grocy and the todo.txt list
//!
//! - `chore:<id>` tags bind tasks to Grocy chores
//! - `pull` and `drop` rewrite the active chore tasks
//! - `push` reports completed chore tasks back to Grocy

pub mod error;
pub mod sync;
pub mod tag;

pub use error::{ChoreError, Result};
pub use sync::{
    drop_chores, list, mark_done, pending_completion, pull, push, ChoreLines, Pulled, PushAction,
    PushOutcome, PushReport,
};
pub use tag::{ChoreBinding, AUTO_MARKER, CHORE_TAG_PREFIX};
