//! Per-session registry state and the snapshot views served to callers.

use std::path::PathBuf;

use serde::Serialize;
use tokio::task::JoinHandle;
use vto_core::catalog::GarmentItem;
use vto_core::session::{progress_percentage, SessionStatus};
use vto_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Item outcomes
// ---------------------------------------------------------------------------

/// Successful outcome for one garment.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSuccess {
    /// The garment that was tried on.
    pub item: GarmentItem,
    /// Result image filename within the results directory.
    pub result_filename: String,
    /// Full path of the saved result image.
    pub result_path: PathBuf,
}

/// Failed outcome for one garment.
#[derive(Debug, Clone, Serialize)]
pub struct ItemError {
    /// The garment whose try-on failed.
    pub item: GarmentItem,
    /// Human-readable failure message.
    pub error: String,
}

/// Outcome of processing a single garment.
#[derive(Debug)]
pub(crate) enum ItemOutcome {
    Success(ItemSuccess),
    Failure(ItemError),
}

// ---------------------------------------------------------------------------
// Registry record
// ---------------------------------------------------------------------------

/// Internal registry record for one batch session.
///
/// Only ever read or mutated while the registry lock is held.
pub(crate) struct SessionRecord {
    pub status: SessionStatus,
    pub total_items: usize,
    pub completed_items: usize,
    pub failed_items: usize,
    /// Successful outcomes in completion order.
    pub results: Vec<ItemSuccess>,
    /// Failed outcomes in completion order.
    pub errors: Vec<ItemError>,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub duration_secs: Option<f64>,
    /// Distinguishes this registration from an earlier one under the
    /// same id. Outcomes from a run whose token no longer matches (the
    /// session was cleaned up and the id reused) are dropped.
    pub run_token: u64,
    /// Supervised handle of the dispatch run; absent for zero-item
    /// batches and taken during shutdown.
    pub run: Option<JoinHandle<()>>,
}

impl SessionRecord {
    pub fn new(total_items: usize, run_token: u64) -> Self {
        Self {
            status: SessionStatus::Processing,
            total_items,
            completed_items: 0,
            failed_items: 0,
            results: Vec::new(),
            errors: Vec::new(),
            started_at: chrono::Utc::now(),
            ended_at: None,
            duration_secs: None,
            run_token,
            run: None,
        }
    }

    /// Items processed so far, success or failure.
    pub fn total_processed(&self) -> usize {
        self.completed_items + self.failed_items
    }

    /// One-time transition to `Completed`, stamping end time and
    /// duration. The caller must hold the registry write lock.
    pub fn finalize(&mut self) {
        let ended = chrono::Utc::now();
        self.status = SessionStatus::Completed;
        self.duration_secs = Some((ended - self.started_at).num_milliseconds() as f64 / 1000.0);
        self.ended_at = Some(ended);
    }

    pub fn status_view(&self, session_id: &str) -> StatusView {
        StatusView {
            session_id: session_id.to_string(),
            status: self.status,
            total_items: self.total_items,
            completed_items: self.completed_items,
            failed_items: self.failed_items,
            total_processed: self.total_processed(),
            progress_percentage: progress_percentage(self.total_processed(), self.total_items),
        }
    }

    pub fn results_view(&self, session_id: &str) -> ResultsView {
        ResultsView {
            session_id: session_id.to_string(),
            status: self.status,
            total_items: self.total_items,
            completed_items: self.completed_items,
            failed_items: self.failed_items,
            results: self.results.clone(),
            errors: self.errors.clone(),
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_secs: self.duration_secs.unwrap_or(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot views
// ---------------------------------------------------------------------------

/// Point-in-time progress snapshot for one session.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub session_id: String,
    pub status: SessionStatus,
    pub total_items: usize,
    pub completed_items: usize,
    pub failed_items: usize,
    pub total_processed: usize,
    pub progress_percentage: f64,
}

/// Final results of a completed session.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub session_id: String,
    pub status: SessionStatus,
    pub total_items: usize,
    pub completed_items: usize,
    pub failed_items: usize,
    /// Successful outcomes in completion order.
    pub results: Vec<ItemSuccess>,
    /// Failed outcomes in completion order.
    pub errors: Vec<ItemError>,
    pub started_at: Timestamp,
    /// Set by the terminal transition; absent only for a record that
    /// has not completed, which `results_view` callers never see.
    pub ended_at: Option<Timestamp>,
    pub duration_secs: f64,
}
