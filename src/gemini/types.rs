use serde::{Deserialize, Serialize};

use super::AdviceError;

/// Structured advice returned by the model for one complaint.
///
/// `summary` is required; the array fields are lenient — a model that omits
/// one produces an empty list, not a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAdvice {
    pub summary: String,
    #[serde(default)]
    pub possible_causes: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub seek_doctor_if: Vec<String>,
}

/// Advice-fetching client abstraction (allows mocking)
pub trait AdviceClient: Send + Sync {
    /// Fetch structured advice for a trimmed, non-empty complaint.
    ///
    /// Blocking — callers on an async runtime must go through
    /// `tokio::task::spawn_blocking`.
    fn fetch_advice(&self, complaint: &str) -> Result<HealthAdvice, AdviceError>;
}
