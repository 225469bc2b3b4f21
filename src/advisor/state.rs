use serde::{Deserialize, Serialize};

use crate::gemini::HealthAdvice;

/// Shown when submit is pressed with nothing to submit.
pub const EMPTY_COMPLAINT_MESSAGE: &str = "Please describe your health problem.";

/// Shown for every fetch failure, whatever the underlying cause.
pub const FETCH_FAILURE_MESSAGE: &str =
    "Sorry, an error occurred while fetching advice. Please try again.";

/// Where the submission lifecycle currently stands.
///
/// `Success` and `Failed` are observable but not terminal — the next valid
/// submit re-enters `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// The controller-owned state record.
///
/// Invariant: after any completed submission at most one of `advice` and
/// `error` is present, and `loading` is true exactly while a fetch is
/// outstanding. The transition methods below are the only writers.
#[derive(Debug)]
pub struct AdvisorState {
    pub complaint_text: String,
    pub advice: Option<HealthAdvice>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: SubmissionPhase,
    /// When the outstanding fetch started (ISO 8601); present iff `loading`.
    pub in_flight_since: Option<String>,
}

/// Serializable view of the state for the presentation surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorSnapshot {
    pub complaint_text: String,
    pub advice: Option<HealthAdvice>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: SubmissionPhase,
    pub in_flight_since: Option<String>,
}

impl AdvisorState {
    pub fn new() -> Self {
        Self {
            complaint_text: String::new(),
            advice: None,
            loading: false,
            error: None,
            phase: SubmissionPhase::Idle,
            in_flight_since: None,
        }
    }

    /// Replace the complaint text unconditionally. Validation is deferred
    /// to submission.
    pub fn set_complaint_text(&mut self, text: String) {
        self.complaint_text = text;
    }

    /// Validation failure: empty or whitespace-only complaint.
    /// Sets the specific message; advice, loading, and phase are untouched.
    pub fn reject_empty(&mut self) {
        self.error = Some(EMPTY_COMPLAINT_MESSAGE.to_string());
    }

    /// Enter the in-flight state. Clears any stale result and error before
    /// the asynchronous call begins, so the surface never shows a prior
    /// result alongside a new request.
    pub fn begin_submission(&mut self) {
        self.loading = true;
        self.error = None;
        self.advice = None;
        self.phase = SubmissionPhase::Submitting;
        self.in_flight_since = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Record a successful fetch.
    pub fn complete_success(&mut self, advice: HealthAdvice) {
        self.advice = Some(advice);
        self.error = None;
        self.phase = SubmissionPhase::Success;
        self.loading = false;
        self.in_flight_since = None;
    }

    /// Record a failed fetch. The underlying error is the caller's to log;
    /// the user only ever sees the generic message.
    pub fn complete_failure(&mut self) {
        self.advice = None;
        self.error = Some(FETCH_FAILURE_MESSAGE.to_string());
        self.phase = SubmissionPhase::Failed;
        self.loading = false;
        self.in_flight_since = None;
    }

    pub fn snapshot(&self) -> AdvisorSnapshot {
        AdvisorSnapshot {
            complaint_text: self.complaint_text.clone(),
            advice: self.advice.clone(),
            loading: self.loading,
            error: self.error.clone(),
            phase: self.phase,
            in_flight_since: self.in_flight_since.clone(),
        }
    }
}

impl Default for AdvisorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_advice() -> HealthAdvice {
        HealthAdvice {
            summary: "Possible common cold".to_string(),
            possible_causes: vec![],
            recommendations: vec!["Rest and stay hydrated".to_string()],
            seek_doctor_if: vec![],
        }
    }

    #[test]
    fn new_state_is_idle_and_empty() {
        let state = AdvisorState::new();
        assert_eq!(state.phase, SubmissionPhase::Idle);
        assert!(!state.loading);
        assert!(state.advice.is_none());
        assert!(state.error.is_none());
        assert!(state.in_flight_since.is_none());
    }

    #[test]
    fn set_complaint_text_replaces_unconditionally() {
        let mut state = AdvisorState::new();
        state.set_complaint_text("headache".to_string());
        state.set_complaint_text("   ".to_string());
        assert_eq!(state.complaint_text, "   ");
    }

    #[test]
    fn reject_empty_leaves_advice_and_loading_untouched() {
        let mut state = AdvisorState::new();
        state.complete_success(sample_advice());
        state.reject_empty();
        assert_eq!(state.error.as_deref(), Some(EMPTY_COMPLAINT_MESSAGE));
        assert!(state.advice.is_some());
        assert!(!state.loading);
    }

    #[test]
    fn begin_submission_clears_stale_result_and_error() {
        let mut state = AdvisorState::new();
        state.complete_success(sample_advice());
        state.begin_submission();
        assert!(state.loading);
        assert!(state.advice.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.phase, SubmissionPhase::Submitting);
        assert!(state.in_flight_since.is_some());
    }

    #[test]
    fn success_and_error_are_mutually_exclusive() {
        let mut state = AdvisorState::new();

        state.begin_submission();
        state.complete_failure();
        assert!(state.advice.is_none());
        assert!(state.error.is_some());

        state.begin_submission();
        state.complete_success(sample_advice());
        assert!(state.advice.is_some());
        assert!(state.error.is_none());
    }

    #[test]
    fn completion_clears_loading_and_timestamp() {
        let mut state = AdvisorState::new();
        state.begin_submission();
        state.complete_failure();
        assert!(!state.loading);
        assert!(state.in_flight_since.is_none());
        assert_eq!(state.phase, SubmissionPhase::Failed);
    }

    #[test]
    fn failed_reenters_submitting_on_next_attempt() {
        let mut state = AdvisorState::new();
        state.begin_submission();
        state.complete_failure();
        state.begin_submission();
        assert_eq!(state.phase, SubmissionPhase::Submitting);
        assert!(state.error.is_none());
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&SubmissionPhase::Submitting).unwrap();
        assert_eq!(json, "\"submitting\"");
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut state = AdvisorState::new();
        state.set_complaint_text("chest pain".to_string());
        state.begin_submission();
        let snap = state.snapshot();
        assert_eq!(snap.complaint_text, "chest pain");
        assert!(snap.loading);
        assert_eq!(snap.phase, SubmissionPhase::Submitting);
    }
}
