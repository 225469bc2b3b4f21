//! Request/response controller — owns the submission state and drives the
//! advice fetch lifecycle.
//!
//! **Design**:
//! - One outstanding fetch at a time: a submit while `loading` is true is
//!   suppressed, never queued.
//! - The blocking advice client runs on `spawn_blocking`; the server stays
//!   responsive and `GET` snapshots observe `loading = true` meanwhile.
//! - `InFlightGuard` clears the loading flag on every exit path — a panicked
//!   fetch task or an aborted submit future still leaves the state truthful.

use std::sync::{Arc, Mutex};

use crate::gemini::AdviceClient;

use super::state::{AdvisorSnapshot, AdvisorState, SubmissionPhase};
use super::AdvisorError;

/// What a `submit()` call did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The fetch ran to completion; the snapshot shows success or failure.
    Completed(AdvisorSnapshot),
    /// Validation failed before any external call was made.
    RejectedEmptyInput(AdvisorSnapshot),
    /// A fetch was already outstanding; nothing was changed.
    SuppressedInFlight(AdvisorSnapshot),
}

impl SubmitOutcome {
    pub fn snapshot(&self) -> &AdvisorSnapshot {
        match self {
            Self::Completed(s) | Self::RejectedEmptyInput(s) | Self::SuppressedInFlight(s) => s,
        }
    }
}

/// Owns the state record and the advice-fetching collaborator.
pub struct AdvisorController {
    state: Mutex<AdvisorState>,
    client: Arc<dyn AdviceClient>,
}

impl AdvisorController {
    pub fn new(client: Arc<dyn AdviceClient>) -> Self {
        Self {
            state: Mutex::new(AdvisorState::new()),
            client,
        }
    }

    /// Replace the complaint text. No validation here.
    pub fn update_complaint_text(&self, text: String) -> Result<AdvisorSnapshot, AdvisorError> {
        let mut state = self.state.lock().map_err(|_| AdvisorError::LockPoisoned)?;
        state.set_complaint_text(text);
        Ok(state.snapshot())
    }

    /// Current state for the presentation surface.
    pub fn snapshot(&self) -> Result<AdvisorSnapshot, AdvisorError> {
        let state = self.state.lock().map_err(|_| AdvisorError::LockPoisoned)?;
        Ok(state.snapshot())
    }

    /// Run the submission lifecycle once.
    ///
    /// Validates, enters the in-flight state, invokes the collaborator
    /// exactly once with the trimmed complaint, and maps the outcome back
    /// into the state record. Fetch failure detail is logged, never shown.
    pub async fn submit(&self) -> Result<SubmitOutcome, AdvisorError> {
        let complaint = {
            let mut state = self.state.lock().map_err(|_| AdvisorError::LockPoisoned)?;

            if state.loading {
                tracing::debug!("Submit suppressed: a fetch is already in flight");
                return Ok(SubmitOutcome::SuppressedInFlight(state.snapshot()));
            }

            let trimmed = state.complaint_text.trim().to_string();
            if trimmed.is_empty() {
                state.reject_empty();
                return Ok(SubmitOutcome::RejectedEmptyInput(state.snapshot()));
            }

            state.begin_submission();
            trimmed
        };

        let guard = InFlightGuard {
            state: &self.state,
            armed: true,
        };

        let client = Arc::clone(&self.client);
        let fetched =
            tokio::task::spawn_blocking(move || client.fetch_advice(&complaint)).await;

        let mut state = self.state.lock().map_err(|_| AdvisorError::LockPoisoned)?;
        match fetched {
            Ok(Ok(advice)) => {
                tracing::info!("Advice fetch succeeded");
                state.complete_success(advice);
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "Advice fetch failed");
                state.complete_failure();
            }
            Err(join_err) => {
                tracing::error!(error = %join_err, "Advice fetch task did not complete");
                state.complete_failure();
            }
        }
        let snapshot = state.snapshot();
        drop(state);
        guard.disarm();

        Ok(SubmitOutcome::Completed(snapshot))
    }
}

/// Guaranteed cleanup for an in-flight submission.
///
/// If `submit()` exits without recording an outcome — the guard is still
/// armed because the future was dropped or a lock was poisoned past the
/// `begin_submission` point — the drop path records a generic failure so the
/// loading flag can never stay stuck at true.
struct InFlightGuard<'a> {
    state: &'a Mutex<AdvisorState>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut state) = self.state.lock() {
            if state.phase == SubmissionPhase::Submitting {
                state.complete_failure();
            }
        }
    }
}
