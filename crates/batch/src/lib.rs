//! Batch try-on coordination.
//!
//! Owns the in-memory session registry, launches one bounded-parallelism
//! dispatch run per batch submission, and serves consistent progress and
//! result snapshots while runs are in flight.

pub mod coordinator;
pub mod session;

pub use coordinator::{BatchCoordinator, CoordinatorConfig, CoordinatorError};
pub use session::{ItemError, ItemSuccess, ResultsView, StatusView};
