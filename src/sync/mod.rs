//! Client-side replica of the bug collection.
//!
//! `BugSync` owns three pieces of state (the replica, a loading flag and the
//! last error message) and changes them only after the service client reports
//! the outcome of a round trip. A failed call records its message in `error`
//! and leaves the replica exactly as it was; nothing is applied optimistically.
//!
//! State lives in a `tokio::sync::watch` channel so observers can
//! [`subscribe`](BugSync::subscribe) to every transition. Operations take
//! `&self`; callers that fire several at once through an `Arc<BugSync>` get
//! last-response-wins on the shared replica.

use tokio::sync::watch;

use crate::client::{BugClient, ClientError};
use crate::models::{Bug, CreateBugRequest, UpdateBugRequest};

/// Snapshot of the replica and its status flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    pub bugs: Vec<Bug>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            bugs: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

/// Keeps an in-memory list of bugs consistent with the server.
#[derive(Debug)]
pub struct BugSync {
    client: BugClient,
    state: watch::Sender<SyncState>,
}

impl BugSync {
    /// Create the synchronizer in its initial state (`loading`, empty replica).
    pub fn new(client: BugClient) -> Self {
        Self {
            client,
            state: watch::Sender::new(SyncState::default()),
        }
    }

    /// Create the synchronizer and run the initial load.
    pub async fn connect(client: BugClient) -> Self {
        let sync = Self::new(client);
        // A failed load is recorded in `error`.
        let _ = sync.refresh().await;
        sync
    }

    pub fn snapshot(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub fn bugs(&self) -> Vec<Bug> {
        self.state.borrow().bugs.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Receive every state transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Replace the replica with the server's current list.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.state.send_modify(|state| state.loading = true);

        match self.client.list().await {
            Ok(response) => {
                tracing::debug!(count = response.data.len(), "Loaded bugs");
                self.state.send_modify(|state| {
                    state.bugs = response.data;
                    state.loading = false;
                    state.error = None;
                });
                Ok(())
            }
            Err(err) => {
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.to_string());
                });
                tracing::warn!("Loading bugs failed: {}", err);
                Err(err)
            }
        }
    }

    /// Create a bug and append the server's copy to the replica.
    pub async fn add_bug(&self, fields: &CreateBugRequest) -> Result<Bug, ClientError> {
        let response = self
            .client
            .create(fields)
            .await
            .map_err(|err| self.record_failure(err))?;

        let bug = response.data;
        self.state.send_modify(|state| state.bugs.push(bug.clone()));
        Ok(bug)
    }

    /// Update a bug and replace the replica entry with the same id.
    pub async fn modify_bug(
        &self,
        id: &str,
        fields: &UpdateBugRequest,
    ) -> Result<Bug, ClientError> {
        let response = self
            .client
            .update(id, fields)
            .await
            .map_err(|err| self.record_failure(err))?;

        let bug = response.data;
        self.state.send_modify(|state| {
            for entry in state.bugs.iter_mut().filter(|entry| entry.id == id) {
                *entry = bug.clone();
            }
        });
        Ok(bug)
    }

    /// Delete a bug and drop it from the replica.
    pub async fn remove_bug(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(id)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.state
            .send_modify(|state| state.bugs.retain(|entry| entry.id != id));
        Ok(())
    }

    fn record_failure(&self, err: ClientError) -> ClientError {
        tracing::warn!("Bug operation failed, replica unchanged: {}", err);
        let message = err.to_string();
        self.state.send_modify(|state| state.error = Some(message));
        err
    }
}
