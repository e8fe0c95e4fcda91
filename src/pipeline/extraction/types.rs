use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Text content of a single PDF page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
}

/// How the document text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Embedded text layer of a digital PDF
    PdfDirect,
    /// Rasterized pages + optical character recognition
    Ocr,
}

/// Result of text acquisition for one document.
/// `text` is the newline-joined page text in page order, trimmed of
/// leading/trailing whitespace. Empty text means the document is
/// unprocessable — callers must not extract, summarize, or store it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquiredText {
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: usize,
}

impl AcquiredText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Embedded-text-layer extraction abstraction
pub trait PdfExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError>;
}

/// Page-to-image rendering abstraction for the OCR fallback.
/// Implementations return single-channel grayscale PNG bytes.
pub trait PdfPageRenderer {
    fn render_page(&self, pdf_bytes: &[u8], page_number: usize)
        -> Result<Vec<u8>, ExtractionError>;
}

/// OCR engine abstraction (allows mocking for tests)
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}
