//! In-memory chore gateway for tests.
//!
//! [`RecordingGateway`] serves a fixed chore list and records every call made
//! to it, so tests can assert exactly which remote effects an operation had.

use chrono::NaiveDateTime;
use std::sync::Mutex;

use super::gateway::{ChoreGateway, ChoreId, ChoreRecord, RemoteError};

/// A call observed by [`RecordingGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List { include_all: bool },
    Execute { id: ChoreId, at: Option<NaiveDateTime> },
    Skip { id: ChoreId },
}

#[derive(Debug, Default)]
pub struct RecordingGateway {
    chores: Vec<ChoreRecord>,
    list_error: Option<RemoteError>,
    failing: Option<(ChoreId, RemoteError)>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl RecordingGateway {
    pub fn new(chores: Vec<ChoreRecord>) -> Self {
        Self {
            chores,
            ..Self::default()
        }
    }

    /// Make `list_chores` fail with `error`
    pub fn failing_list(mut self, error: RemoteError) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Make execute and skip calls for `id` fail with `error`
    pub fn failing_on(mut self, id: ChoreId, error: RemoteError) -> Self {
        self.failing = Some((id, error));
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().clone()
    }

    /// Execute and skip calls only
    pub fn writes(&self) -> Vec<GatewayCall> {
        self.lock()
            .iter()
            .filter(|call| !matches!(call, GatewayCall::List { .. }))
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GatewayCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: GatewayCall) {
        self.lock().push(call);
    }

    fn check_failure(&self, id: ChoreId) -> Result<(), RemoteError> {
        match &self.failing {
            Some((failing, error)) if *failing == id => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl ChoreGateway for RecordingGateway {
    async fn list_chores(&self, include_all: bool) -> Result<Vec<ChoreRecord>, RemoteError> {
        self.record(GatewayCall::List { include_all });
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }
        Ok(self
            .chores
            .iter()
            .filter(|chore| include_all || chore.due_now)
            .cloned()
            .collect())
    }

    async fn execute_chore(&self, id: ChoreId, at: Option<NaiveDateTime>) -> Result<(), RemoteError> {
        self.check_failure(id)?;
        self.record(GatewayCall::Execute { id, at });
        Ok(())
    }

    async fn skip_chore(&self, id: ChoreId) -> Result<(), RemoteError> {
        self.check_failure(id)?;
        self.record(GatewayCall::Skip { id });
        Ok(())
    }
}
