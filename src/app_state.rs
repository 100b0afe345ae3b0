//! Submission lifecycle state, owned by the UI layer.
//!
//! The observable machine is `Idle -> Submitting -> Completed | Failed`.
//! There is no cancellation transition, and nothing stops a second
//! attempt from starting while one is outstanding: whichever completion
//! lands last is the one displayed.

use crate::api_client::PredictionResult;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    /// Idle again, with the latest result on display.
    Completed(PredictionResult),
    /// Idle again, with a transient failure notice.
    Failed(String),
}

/// Explicit state container for submissions. One instance per form
/// screen, mutated only through the three transition methods.
#[derive(Debug)]
pub struct SubmissionTracker {
    state: SubmissionState,
    attempts: u64,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Number of attempts started so far, for the status line.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.state {
            SubmissionState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start an attempt. Any previous result or error is cleared now so
    /// the display never mixes an old result with a new submission.
    /// Calling this while already Submitting is legal (no guard).
    pub fn begin(&mut self) {
        self.attempts += 1;
        tracing::debug!(target: "submit", "attempt {} started", self.attempts);
        self.state = SubmissionState::Submitting;
    }

    /// Record a completed round trip. Overwrites whatever state was
    /// current, so with overlapping attempts the last completion wins.
    pub fn complete(&mut self, result: PredictionResult) {
        tracing::info!(
            target: "submit",
            "completed: score={} rating={}",
            result.credit_score,
            result.rating.as_str()
        );
        self.state = SubmissionState::Completed(result);
    }

    /// Record a failed round trip. Exactly one failure signal per
    /// attempt; the message is the user-facing notice.
    pub fn fail(&mut self, message: String) {
        tracing::warn!(target: "submit", "failed: {}", message);
        self.state = SubmissionState::Failed(message);
    }
}

impl Default for SubmissionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::Rating;

    fn result(score: u32) -> PredictionResult {
        PredictionResult {
            default_probability: 0.1,
            credit_score: score,
            rating: Rating::Average,
            loan_to_income_ratio: 1.5,
        }
    }

    #[test]
    fn starts_idle_with_nothing_to_show() {
        let tracker = SubmissionTracker::new();
        assert_eq!(*tracker.state(), SubmissionState::Idle);
        assert!(tracker.result().is_none());
        assert!(tracker.error().is_none());
    }

    #[test]
    fn success_path_transitions() {
        let mut tracker = SubmissionTracker::new();
        tracker.begin();
        assert!(tracker.is_submitting());
        tracker.complete(result(700));
        assert!(!tracker.is_submitting());
        assert_eq!(tracker.result().unwrap().credit_score, 700);
    }

    #[test]
    fn failure_path_leaves_no_result() {
        let mut tracker = SubmissionTracker::new();
        tracker.begin();
        tracker.fail("connection refused".to_string());
        assert!(tracker.result().is_none());
        assert_eq!(tracker.error(), Some("connection refused"));
    }

    #[test]
    fn begin_clears_previous_result() {
        let mut tracker = SubmissionTracker::new();
        tracker.begin();
        tracker.complete(result(700));
        tracker.begin();
        assert!(tracker.result().is_none());
        assert!(tracker.is_submitting());
        assert_eq!(tracker.attempts(), 2);
    }

    #[test]
    fn overlapping_attempts_last_completion_wins() {
        let mut tracker = SubmissionTracker::new();
        // Two attempts dispatched before either resolves
        tracker.begin();
        tracker.begin();
        // First attempt's response lands, then the second's
        tracker.complete(result(650));
        tracker.complete(result(810));
        assert_eq!(tracker.result().unwrap().credit_score, 810);
    }

    #[test]
    fn late_failure_overwrites_earlier_success() {
        let mut tracker = SubmissionTracker::new();
        tracker.begin();
        tracker.begin();
        tracker.complete(result(650));
        tracker.fail("HTTP 500".to_string());
        assert!(tracker.result().is_none());
        assert_eq!(tracker.error(), Some("HTTP 500"));
    }
}
