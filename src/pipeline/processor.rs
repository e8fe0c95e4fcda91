use rusqlite::Connection;
use thiserror::Error;

use crate::db::repository::{
    insert_invoice, insert_loan, InvoiceRecord, LoanRecord, SaveOutcome,
};
use crate::db::DatabaseError;
use crate::pipeline::dedup::fingerprint;
use crate::pipeline::extraction::{ExtractionError, ExtractionMethod, TextAcquirer};
use crate::pipeline::fields::{DocumentClass, FieldSet};
use crate::pipeline::summary::{Summarizer, SummaryError};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Text acquisition failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("No text could be extracted from the document")]
    EmptyDocument,

    #[error("Summarization failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Everything the presentation layer needs to render for one upload.
#[derive(Debug)]
pub struct ProcessedDocument {
    pub class: DocumentClass,
    pub fingerprint: String,
    pub text: String,
    pub method: ExtractionMethod,
    pub fields: FieldSet,
    pub summary: String,
    pub outcome: SaveOutcome,
}

/// Drives one document start to finish: acquire text, extract fields,
/// summarize, fingerprint, persist. Single document at a time; there is
/// no background work.
pub struct DocumentProcessor {
    acquirer: TextAcquirer,
    summarizer: Box<dyn Summarizer + Send + Sync>,
}

impl DocumentProcessor {
    pub fn new(acquirer: TextAcquirer, summarizer: Box<dyn Summarizer + Send + Sync>) -> Self {
        Self {
            acquirer,
            summarizer,
        }
    }

    /// Process one uploaded PDF. An unreadable PDF or a document with no
    /// extractable text halts processing with nothing stored. A repeat
    /// upload of the same extracted text is reported as
    /// `SaveOutcome::DuplicateRejected`.
    pub fn process(
        &self,
        conn: &Connection,
        pdf_bytes: &[u8],
        class: DocumentClass,
    ) -> Result<ProcessedDocument, ProcessError> {
        let acquired = self.acquirer.acquire(pdf_bytes)?;
        if acquired.is_empty() {
            return Err(ProcessError::EmptyDocument);
        }

        tracing::info!(
            class = class.as_str(),
            method = ?acquired.method,
            pages = acquired.page_count,
            chars = acquired.text.len(),
            "Text acquired"
        );

        let fields = FieldSet::extract(&acquired.text, class);
        let summary = self.summarizer.summarize(&acquired.text, class)?;
        let fp = fingerprint(&acquired.text);

        let outcome = match &fields {
            FieldSet::Invoice(f) => insert_invoice(
                conn,
                &InvoiceRecord {
                    fingerprint: fp.clone(),
                    dates: f.dates.render(),
                    amounts: f.amounts.render(),
                    organizations: f.organizations.render(),
                    summary: summary.clone(),
                },
            )?,
            FieldSet::Loan(f) => insert_loan(
                conn,
                &LoanRecord {
                    fingerprint: fp.clone(),
                    applicant_name: f.applicant_name.render(),
                    loan_amounts: f.loan_amounts.render(),
                    loan_reason: f.loan_reason.render(),
                    summary: summary.clone(),
                },
            )?,
        };

        Ok(ProcessedDocument {
            class,
            fingerprint: fp,
            text: acquired.text,
            method: acquired.method,
            fields,
            summary,
            outcome,
        })
    }

    /// Forward a follow-up question about a generated summary.
    pub fn ask(&self, summary: &str, question: &str) -> Result<String, SummaryError> {
        self.summarizer.ask(summary, question)
    }
}
