use super::types::{
    AcquiredText, ExtractionMethod, OcrEngine, PdfExtractor, PdfPageRenderer,
};
use super::ExtractionError;

/// Drives text acquisition for one PDF: embedded text layer first,
/// OCR over rendered grayscale pages as the fallback.
pub struct TextAcquirer {
    pdf: Box<dyn PdfExtractor + Send + Sync>,
    renderer: Box<dyn PdfPageRenderer + Send + Sync>,
    ocr: Option<Box<dyn OcrEngine + Send + Sync>>,
}

impl TextAcquirer {
    pub fn new(
        pdf: Box<dyn PdfExtractor + Send + Sync>,
        renderer: Box<dyn PdfPageRenderer + Send + Sync>,
        ocr: Option<Box<dyn OcrEngine + Send + Sync>>,
    ) -> Self {
        Self { pdf, renderer, ocr }
    }

    /// Default acquirer for digital PDFs only (no OCR engine attached).
    /// Scanned documents will come back with empty text.
    pub fn without_ocr() -> Self {
        Self::new(
            Box::new(super::pdf::PdfTextExtractor),
            Box::new(super::renderer::PdfImageRenderer),
            None,
        )
    }

    /// Acquirer with the bundled Tesseract engine.
    #[cfg(feature = "ocr")]
    pub fn with_tesseract(tessdata_dir: &std::path::Path) -> Result<Self, ExtractionError> {
        let engine = super::ocr::TesseractOcr::new(tessdata_dir)?;
        Ok(Self::new(
            Box::new(super::pdf::PdfTextExtractor),
            Box::new(super::renderer::PdfImageRenderer),
            Some(Box::new(engine)),
        ))
    }

    /// Extract the document text: per-page embedded text in page order,
    /// newline-joined and trimmed. If that comes back empty (scanned or
    /// image-only PDF), rasterize each page to grayscale and OCR it.
    ///
    /// A malformed PDF is a fatal error. Empty text on both paths is not:
    /// the caller gets an empty `AcquiredText` and must treat the
    /// document as unprocessable.
    pub fn acquire(&self, pdf_bytes: &[u8]) -> Result<AcquiredText, ExtractionError> {
        let pages = self.pdf.extract_pages(pdf_bytes)?;
        let page_count = pages.len();

        let direct_text = join_pages(pages.iter().map(|p| p.text.as_str()));
        if !direct_text.is_empty() {
            tracing::debug!(page_count, chars = direct_text.len(), "Used embedded text layer");
            return Ok(AcquiredText {
                text: direct_text,
                method: ExtractionMethod::PdfDirect,
                page_count,
            });
        }

        let Some(ocr) = &self.ocr else {
            tracing::warn!("Empty text layer and no OCR engine configured");
            return Ok(AcquiredText {
                text: String::new(),
                method: ExtractionMethod::PdfDirect,
                page_count,
            });
        };

        tracing::info!(page_count, "Empty text layer, falling back to OCR");

        let mut page_texts = Vec::with_capacity(page_count);
        for page_idx in 0..page_count {
            match self
                .renderer
                .render_page(pdf_bytes, page_idx)
                .and_then(|img| ocr.ocr_image(&img))
            {
                Ok(text) => page_texts.push(text),
                Err(e) => {
                    tracing::warn!(page = page_idx, error = %e, "OCR failed for page, skipping");
                }
            }
        }

        Ok(AcquiredText {
            text: join_pages(page_texts.iter().map(String::as_str)),
            method: ExtractionMethod::Ocr,
            page_count,
        })
    }
}

fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    pages.collect::<Vec<_>>().join("\n").trim().to_string()
}
