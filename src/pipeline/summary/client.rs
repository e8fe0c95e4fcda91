use serde::{Deserialize, Serialize};

use super::{SummaryError, Summarizer};
use crate::config::SummaryConfig;
use crate::pipeline::fields::DocumentClass;

const SUMMARIZE_SYSTEM: &str = "You are an AI summarizing documents.";
const ASK_SYSTEM: &str = "You are an AI assistant helping users understand documents.";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;

/// Base backoff for retries; doubles on each attempt.
const RETRY_BACKOFF_MS: u64 = 500;

/// HTTP client for the remote chat-completion summarization service.
pub struct SummaryClient {
    config: SummaryConfig,
    client: reqwest::blocking::Client,
}

impl SummaryClient {
    pub fn new(config: SummaryConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn send_with_retry(&self, request: &ChatRequest<'_>) -> Result<String, SummaryError> {
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(request) {
                Ok(content) => return Ok(content),
                Err(e) if attempt < self.config.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let backoff =
                        std::time::Duration::from_millis(RETRY_BACKOFF_MS << (attempt - 1));
                    tracing::warn!(attempt, error = %e, "Summarization call failed, retrying");
                    std::thread::sleep(backoff);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn send_once(&self, request: &ChatRequest<'_>) -> Result<String, SummaryError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SummaryError::Timeout {
                        secs: self.config.timeout_secs,
                    }
                } else {
                    SummaryError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummaryError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SummaryError::MalformedResponse("no message content in choices".into()))
    }
}

impl Summarizer for SummaryClient {
    fn summarize(&self, text: &str, class: DocumentClass) -> Result<String, SummaryError> {
        let prompt = match class {
            DocumentClass::Invoice => {
                format!("Summarize this invoice, highlighting key details:\n\n{text}")
            }
            DocumentClass::Loan => format!(
                "Summarize this loan application, explaining the reason and key details:\n\n{text}"
            ),
        };

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::system(SUMMARIZE_SYSTEM.to_string()),
                ChatMessage::user(prompt),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        self.send_with_retry(&request)
    }

    fn ask(&self, summary: &str, question: &str) -> Result<String, SummaryError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::system(ASK_SYSTEM.to_string()),
                ChatMessage::user(format!("Document summary:\n{summary}")),
                ChatMessage::user(question.to_string()),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        self.send_with_retry(&request)
    }
}

/// Network errors, timeouts, and 5xx are worth retrying; 4xx and
/// malformed bodies are not.
fn is_retryable(error: &SummaryError) -> bool {
    match error {
        SummaryError::HttpClient(_) | SummaryError::Timeout { .. } => true,
        SummaryError::RemoteStatus { status, .. } => *status >= 500,
        SummaryError::MalformedResponse(_) => false,
    }
}

/// Chat-completion request body
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn system(content: String) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// Chat-completion response body
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Mock summarizer for testing — returns a configurable response.
pub struct MockSummarizer {
    response: String,
}

impl MockSummarizer {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl Summarizer for MockSummarizer {
    fn summarize(&self, _text: &str, _class: DocumentClass) -> Result<String, SummaryError> {
        Ok(self.response.clone())
    }

    fn ask(&self, _summary: &str, _question: &str) -> Result<String, SummaryError> {
        Ok(self.response.clone())
    }
}
