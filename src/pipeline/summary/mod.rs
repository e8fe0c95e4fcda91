pub mod client;

pub use client::*;

use thiserror::Error;

use crate::pipeline::fields::DocumentClass;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Remote service returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// Remote summarization abstraction (allows mocking for tests).
pub trait Summarizer {
    /// Generate a summary of the document text.
    fn summarize(&self, text: &str, class: DocumentClass) -> Result<String, SummaryError>;

    /// Answer a follow-up question about a previously generated summary.
    fn ask(&self, summary: &str, question: &str) -> Result<String, SummaryError>;
}
