use thiserror::Error;

use super::sync::PushOutcome;
use crate::grocy::{ChoreId, RemoteError};
use crate::task::StoreError;

#[derive(Debug, Error)]
pub enum ChoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Chore {chore} is completed but not pushed yet; push and archive it first")]
    PendingCompletion { chore: ChoreId },

    #[error(
        "Push stopped at chore {failed} ({} pushed, {} not attempted)",
        .done.len(),
        .not_attempted.len()
    )]
    PushAborted {
        failed: ChoreId,
        #[source]
        source: RemoteError,
        /// Calls that succeeded before the failure
        done: Vec<PushOutcome>,
        /// Chores after the failing one, in push order
        not_attempted: Vec<ChoreId>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ChoreError>;
