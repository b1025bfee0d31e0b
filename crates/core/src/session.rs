//! Session status vocabulary and progress math.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Session status
// ---------------------------------------------------------------------------

/// Status of a batch try-on session.
///
/// A session is `Processing` from registration until its final item
/// outcome is recorded, then `Completed`. There is no failed status at
/// the session level: a session completes even if every item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Items are still being dispatched or processed.
    Processing,
    /// Every item outcome has been recorded.
    Completed,
}

impl SessionStatus {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Completed => "Completed",
        }
    }

    /// Whether this is the terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ---------------------------------------------------------------------------
// Progress math
// ---------------------------------------------------------------------------

/// Percentage of items processed, rounded to one decimal place.
///
/// Defined as `0.0` for an empty batch to avoid dividing by zero.
pub fn progress_percentage(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = (processed as f64 / total as f64) * 100.0;
    (pct * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_zero_total_is_zero() {
        assert_eq!(progress_percentage(0, 0), 0.0);
    }

    #[test]
    fn progress_complete_is_one_hundred() {
        assert_eq!(progress_percentage(8, 8), 100.0);
    }

    #[test]
    fn progress_rounds_to_one_decimal() {
        // 1/3 => 33.333...% => 33.3%
        assert_eq!(progress_percentage(1, 3), 33.3);
        // 2/3 => 66.666...% => 66.7%
        assert_eq!(progress_percentage(2, 3), 66.7);
    }

    #[test]
    fn progress_partial() {
        assert_eq!(progress_percentage(3, 4), 75.0);
    }

    #[test]
    fn status_labels() {
        assert_eq!(SessionStatus::Processing.label(), "Processing");
        assert_eq!(SessionStatus::Completed.label(), "Completed");
    }

    #[test]
    fn only_completed_is_terminal() {
        assert!(!SessionStatus::Processing.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
