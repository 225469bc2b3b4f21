use serde::{Deserialize, Serialize};

use super::parser::parse_advice_response;
use super::prompt::{build_advice_prompt, ADVICE_SYSTEM_PROMPT};
use super::types::{AdviceClient, HealthAdvice};
use super::AdviceError;
use crate::config::GeminiConfig;

/// Gemini HTTP client for advice generation.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client from resolved configuration.
    pub fn new(config: &GeminiConfig) -> Result<Self, AdviceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdviceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for `generateContent`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

/// Response body from `generateContent` — only the fields consumed here.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    fn candidate_text(response: GenerateContentResponse) -> Result<String, AdviceError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AdviceError::MalformedResponse(
                "No candidate text in response".into(),
            ));
        }
        Ok(text)
    }
}

impl AdviceClient for GeminiClient {
    fn fetch_advice(&self, complaint: &str) -> Result<HealthAdvice, AdviceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let prompt = build_advice_prompt(complaint);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: &prompt }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: ADVICE_SYSTEM_PROMPT,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.2,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AdviceError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    AdviceError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    AdviceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdviceError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| AdviceError::ResponseParsing(e.to_string()))?;

        let text = Self::candidate_text(parsed)?;
        parse_advice_response(&text)
    }
}

/// Mock advice client for testing — returns a configurable outcome.
///
/// An optional gate holds `fetch_advice` open until the test releases it,
/// which lets tests observe the in-flight state of a submission.
pub struct MockAdviceClient {
    advice: Option<HealthAdvice>,
    failure: Option<String>,
    /// Fail this many calls before falling back to the configured outcome.
    initial_failures: usize,
    gate: std::sync::Mutex<Option<std::sync::mpsc::Receiver<()>>>,
    calls: std::sync::atomic::AtomicUsize,
    last_complaint: std::sync::Mutex<Option<String>>,
}

impl MockAdviceClient {
    pub fn succeeding(advice: HealthAdvice) -> Self {
        Self {
            advice: Some(advice),
            failure: None,
            initial_failures: 0,
            gate: std::sync::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_complaint: std::sync::Mutex::new(None),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            advice: None,
            failure: Some(detail.to_string()),
            initial_failures: 0,
            gate: std::sync::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_complaint: std::sync::Mutex::new(None),
        }
    }

    /// Fail the first `n` fetches before the configured outcome applies.
    pub fn with_initial_failures(mut self, n: usize, detail: &str) -> Self {
        self.initial_failures = n;
        self.failure = Some(detail.to_string());
        self
    }

    /// Hold each fetch open until the paired sender fires (or drops).
    pub fn with_gate(self, gate: std::sync::mpsc::Receiver<()>) -> Self {
        if let Ok(mut slot) = self.gate.lock() {
            *slot = Some(gate);
        }
        self
    }

    /// How many times `fetch_advice` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// The complaint text passed to the most recent fetch.
    pub fn last_complaint(&self) -> Option<String> {
        self.last_complaint.lock().ok().and_then(|c| c.clone())
    }
}

impl AdviceClient for MockAdviceClient {
    fn fetch_advice(&self, complaint: &str) -> Result<HealthAdvice, AdviceError> {
        let call = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Ok(mut last) = self.last_complaint.lock() {
            *last = Some(complaint.to_string());
        }

        if let Ok(slot) = self.gate.lock() {
            if let Some(rx) = slot.as_ref() {
                let _ = rx.recv();
            }
        }

        if call < self.initial_failures {
            let detail = self.failure.clone().unwrap_or_else(|| "mock failure".into());
            return Err(AdviceError::HttpClient(detail));
        }

        match (&self.advice, &self.failure) {
            (Some(advice), _) => Ok(advice.clone()),
            (None, Some(detail)) => Err(AdviceError::HttpClient(detail.clone())),
            (None, None) => Err(AdviceError::MalformedResponse("mock unset".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GeminiConfig {
        GeminiConfig {
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 30,
        }
    }

    fn sample_advice() -> HealthAdvice {
        HealthAdvice {
            summary: "Possible common cold".to_string(),
            possible_causes: vec!["Viral infection".to_string()],
            recommendations: vec!["Rest".to_string()],
            seek_doctor_if: vec!["High fever".to_string()],
        }
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GeminiClient::new(&test_config()).unwrap();
        assert_eq!(
            client.base_url(),
            "https://generativelanguage.googleapis.com"
        );
    }

    #[test]
    fn request_body_is_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: "hello" }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart { text: "system" }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.2,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
    }

    #[test]
    fn candidate_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"summary\":"},{"text":"\"ok\"}"}]}}]}"#,
        )
        .unwrap();
        let text = GeminiClient::candidate_text(response).unwrap();
        assert_eq!(text, "{\"summary\":\"ok\"}");
    }

    #[test]
    fn empty_candidates_is_malformed() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        let result = GeminiClient::candidate_text(response);
        assert!(matches!(result, Err(AdviceError::MalformedResponse(_))));
    }

    #[test]
    fn mock_client_returns_configured_advice() {
        let client = MockAdviceClient::succeeding(sample_advice());
        let advice = client.fetch_advice("dry cough").unwrap();
        assert_eq!(advice.summary, "Possible common cold");
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn mock_client_failure() {
        let client = MockAdviceClient::failing("network timeout");
        let result = client.fetch_advice("chest pain");
        assert!(matches!(result, Err(AdviceError::HttpClient(_))));
    }

    #[test]
    fn mock_gate_releases_on_send() {
        let (tx, rx) = std::sync::mpsc::channel();
        let client = std::sync::Arc::new(
            MockAdviceClient::succeeding(sample_advice()).with_gate(rx),
        );

        let worker = {
            let client = std::sync::Arc::clone(&client);
            std::thread::spawn(move || client.fetch_advice("headache"))
        };

        tx.send(()).unwrap();
        let advice = worker.join().unwrap().unwrap();
        assert_eq!(advice.summary, "Possible common cold");
    }
}
