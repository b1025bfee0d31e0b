//! The batch coordinator: session registry and dispatch runs.
//!
//! [`BatchCoordinator`] maps session ids to in-memory batch state.
//! `start_batch` registers a session and spawns one supervised dispatch
//! run; within the run, items are processed with bounded parallelism
//! and every completion applies a single locked update: append the
//! outcome, bump the matching counter, and finalize the session when
//! the last outcome lands.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::RwLock;
use vto_core::catalog::GarmentItem;
use vto_core::invoker::TryOnInvoker;
use vto_core::naming::result_filename;
use vto_core::session::SessionStatus;
use vto_core::types::SessionId;

use crate::session::{ItemError, ItemOutcome, ItemSuccess, ResultsView, SessionRecord, StatusView};

/// Default number of concurrent try-on workers per batch.
pub const DEFAULT_MAX_WORKERS: usize = 3;

/// Samples requested per try-on call.
const SAMPLE_COUNT: u8 = 1;

/// How long `shutdown` waits for each outstanding dispatch run.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// The registry shared between the coordinator and its dispatch runs.
type SessionMap = Arc<RwLock<HashMap<SessionId, SessionRecord>>>;

/// Coordinator tuning knobs.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Concurrent try-on calls per batch run.
    pub max_workers: usize,
    /// Directory where result images are written.
    pub results_dir: PathBuf,
}

impl CoordinatorConfig {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            results_dir: results_dir.into(),
        }
    }
}

/// Errors surfaced to callers of the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// No session with this id is registered.
    #[error("Session not found")]
    SessionNotFound(SessionId),

    /// Results were requested while the session is still processing.
    #[error("Processing not completed yet")]
    NotReady(SessionId),

    /// A session with this id is already registered.
    #[error("Session already exists: {0}")]
    SessionExists(SessionId),
}

/// Coordinates batch try-on runs and serves progress snapshots.
///
/// Created once at startup and shared behind an `Arc`. All registry
/// access (creation, completion updates, snapshots, cleanup, listing)
/// goes through the single `sessions` lock, so readers always observe a
/// consistent point-in-time state.
pub struct BatchCoordinator {
    sessions: SessionMap,
    invoker: Arc<dyn TryOnInvoker>,
    config: CoordinatorConfig,
    /// Source of per-registration run tokens.
    run_counter: AtomicU64,
}

impl BatchCoordinator {
    /// Create a coordinator around the given invoker.
    pub fn new(invoker: Arc<dyn TryOnInvoker>, config: CoordinatorConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            invoker,
            config,
            run_counter: AtomicU64::new(0),
        }
    }

    /// Register a batch session and launch its dispatch run.
    ///
    /// Returns as soon as the session is registered; item processing
    /// happens on a spawned run whose handle is retained in the session
    /// record. An empty item list completes the session immediately. An
    /// id that is still registered (processing, or completed but not yet
    /// cleaned up) is rejected with [`CoordinatorError::SessionExists`].
    pub async fn start_batch(
        &self,
        session_id: SessionId,
        person_image: PathBuf,
        items: Vec<GarmentItem>,
    ) -> Result<(), CoordinatorError> {
        let total = items.len();
        let run_token = self.run_counter.fetch_add(1, Ordering::Relaxed);

        {
            let mut sessions = self.sessions.write().await;
            if sessions.contains_key(&session_id) {
                return Err(CoordinatorError::SessionExists(session_id));
            }

            let mut record = SessionRecord::new(total, run_token);
            if items.is_empty() {
                // Nothing to dispatch: an empty batch is complete at birth.
                record.finalize();
            }
            sessions.insert(session_id.clone(), record);
        }

        tracing::info!(
            session_id = %session_id,
            total_items = total,
            "Batch session registered",
        );

        if total == 0 {
            return Ok(());
        }

        let run = tokio::spawn(run_batch(
            Arc::clone(&self.sessions),
            Arc::clone(&self.invoker),
            self.config.clone(),
            session_id.clone(),
            run_token,
            person_image,
            items,
        ));

        // Retain the handle for supervision. The record can already be
        // gone if the caller cleaned up immediately; the run then drains
        // with its updates dropped.
        if let Some(record) = self.sessions.write().await.get_mut(&session_id) {
            record.run = Some(run);
        }

        Ok(())
    }

    /// Point-in-time progress snapshot for a session.
    pub async fn get_status(&self, session_id: &str) -> Result<StatusView, CoordinatorError> {
        let sessions = self.sessions.read().await;
        let record = sessions
            .get(session_id)
            .ok_or_else(|| CoordinatorError::SessionNotFound(session_id.to_string()))?;
        Ok(record.status_view(session_id))
    }

    /// Final results of a completed session.
    ///
    /// Returns [`CoordinatorError::NotReady`] while the session is still
    /// processing; partial data is never exposed.
    pub async fn get_results(&self, session_id: &str) -> Result<ResultsView, CoordinatorError> {
        let sessions = self.sessions.read().await;
        let record = sessions
            .get(session_id)
            .ok_or_else(|| CoordinatorError::SessionNotFound(session_id.to_string()))?;
        if record.status != SessionStatus::Completed {
            return Err(CoordinatorError::NotReady(session_id.to_string()));
        }
        Ok(record.results_view(session_id))
    }

    /// Remove a session record. Removing an unknown id is a no-op.
    pub async fn cleanup_session(&self, session_id: &str) {
        let removed = self.sessions.write().await.remove(session_id);
        if removed.is_some() {
            tracing::info!(session_id, "Session cleaned up");
        }
    }

    /// Ids of sessions currently processing.
    pub async fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions
            .read()
            .await
            .iter()
            .filter(|(_, record)| record.status == SessionStatus::Processing)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Await outstanding dispatch runs, bounding each wait.
    ///
    /// Batches are never cancelled; this gives in-flight runs a window
    /// to drain during process shutdown and surfaces any run that died.
    pub async fn shutdown(&self) {
        let handles: Vec<(SessionId, tokio::task::JoinHandle<()>)> = {
            let mut sessions = self.sessions.write().await;
            sessions
                .iter_mut()
                .filter_map(|(id, record)| record.run.take().map(|h| (id.clone(), h)))
                .collect()
        };

        for (session_id, handle) in handles {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!(session_id = %session_id, error = %e, "Dispatch run task failed");
                }
                Err(_) => {
                    tracing::warn!(session_id = %session_id, "Dispatch run still in flight at shutdown");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch run
// ---------------------------------------------------------------------------

/// Process every item of one batch with bounded parallelism, recording
/// each outcome as it completes. Completion order, not submission
/// order, determines the order of `results` and `errors`.
async fn run_batch(
    sessions: SessionMap,
    invoker: Arc<dyn TryOnInvoker>,
    config: CoordinatorConfig,
    session_id: SessionId,
    run_token: u64,
    person_image: PathBuf,
    items: Vec<GarmentItem>,
) {
    tracing::info!(
        session_id = %session_id,
        items = items.len(),
        max_workers = config.max_workers,
        "Batch run started",
    );

    stream::iter(items)
        .map(|item| process_item(&invoker, &config.results_dir, &session_id, &person_image, item))
        .buffer_unordered(config.max_workers)
        .for_each(|outcome| record_outcome(&sessions, &session_id, run_token, outcome))
        .await;

    tracing::info!(session_id = %session_id, "Batch run finished");
}

/// Process one garment: invoke the try-on call, persist a successful
/// image, and fold every fault into a failure outcome. Nothing
/// propagates past this boundary.
async fn process_item(
    invoker: &Arc<dyn TryOnInvoker>,
    results_dir: &Path,
    session_id: &str,
    person_image: &Path,
    item: GarmentItem,
) -> ItemOutcome {
    match invoker.try_on(person_image, &item.path, SAMPLE_COUNT).await {
        Ok(image) => {
            let filename = result_filename(session_id, &item.name);
            let path = results_dir.join(&filename);
            match tokio::fs::write(&path, &image.jpeg).await {
                Ok(()) => ItemOutcome::Success(ItemSuccess {
                    item,
                    result_filename: filename,
                    result_path: path,
                }),
                Err(e) => ItemOutcome::Failure(ItemError {
                    item,
                    error: format!("Failed to save result image: {e}"),
                }),
            }
        }
        Err(failure) => ItemOutcome::Failure(ItemError {
            item,
            error: failure.to_string(),
        }),
    }
}

/// Apply one completion: append the outcome, bump the matching counter,
/// and perform the terminal transition iff this was the last
/// outstanding item. One write-lock critical section per completion, so
/// two racing final completions cannot both (or neither) finalize.
async fn record_outcome(
    sessions: &SessionMap,
    session_id: &str,
    run_token: u64,
    outcome: ItemOutcome,
) {
    let mut sessions = sessions.write().await;
    let Some(record) = sessions.get_mut(session_id) else {
        tracing::warn!(session_id, "Dropping outcome for a session cleaned up mid-run");
        return;
    };

    // The id may have been cleaned up and reused while this run's item
    // was in flight; only the registration that spawned us may be
    // updated.
    if record.run_token != run_token {
        tracing::warn!(session_id, "Dropping outcome from a superseded run");
        return;
    }

    match outcome {
        ItemOutcome::Success(success) => {
            tracing::debug!(session_id, garment = %success.item.name, "Item completed");
            record.results.push(success);
            record.completed_items += 1;
        }
        ItemOutcome::Failure(failure) => {
            tracing::warn!(
                session_id,
                garment = %failure.item.name,
                error = %failure.error,
                "Item failed",
            );
            record.errors.push(failure);
            record.failed_items += 1;
        }
    }

    if record.total_processed() >= record.total_items && record.status == SessionStatus::Processing
    {
        record.finalize();
        tracing::info!(
            session_id,
            completed = record.completed_items,
            failed = record.failed_items,
            duration_secs = record.duration_secs.unwrap_or(0.0),
            "Batch session completed",
        );
    }
}
