//! PDF text extraction.
//!
//! Pulls the text of every page out of a batch of uploaded PDFs and
//! concatenates it in document-then-page order. A page whose text
//! cannot be extracted contributes the empty string; a document that
//! cannot be parsed at all contributes nothing. Neither stops the
//! batch.

use lopdf::Document;

use crate::core::error::{DocQaError, Result};
use crate::core::types::UploadedDocument;

/// Text extracted from one ingest batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    /// Concatenated text of all pages
    pub text: String,

    /// Pages visited
    pub pages: usize,

    /// Pages whose extraction failed
    pub pages_skipped: usize,

    /// Documents that could not be parsed
    pub documents_skipped: usize,
}

impl ExtractedText {
    /// Number of characters of extracted text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the batch produced any non-whitespace text
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Append page results in order, swallowing per-page failures
    pub fn push_pages<I>(&mut self, source: &str, pages: I)
    where
        I: IntoIterator<Item = (u32, Result<String>)>,
    {
        for (number, page) in pages {
            self.pages += 1;
            match page {
                Ok(text) => self.text.push_str(&text),
                Err(e) => {
                    tracing::warn!("Skipping page {} of {}: {}", number, source, e);
                    self.pages_skipped += 1;
                }
            }
        }
    }
}

/// Extracts text from PDF byte streams with `lopdf`
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every document in the batch
    pub fn extract(&self, documents: &[UploadedDocument]) -> ExtractedText {
        let mut out = ExtractedText::default();

        for doc in documents {
            match self.load(doc) {
                Ok(pdf) => {
                    let before = out.pages;
                    let pages = pdf.get_pages().into_keys().map(|number| {
                        let text = pdf.extract_text(&[number]).map_err(|e| {
                            DocQaError::ExtractionFailed(format!("page {number}: {e}"))
                        });
                        (number, text)
                    });
                    out.push_pages(&doc.name, pages);
                    tracing::debug!("Extracted {} pages from {}", out.pages - before, doc.name);
                }
                Err(e) => {
                    tracing::warn!("Skipping document {}: {}", doc.name, e);
                    out.documents_skipped += 1;
                }
            }
        }

        tracing::info!(
            "Extraction complete: {} documents, {} pages ({} skipped), {} chars",
            documents.len() - out.documents_skipped,
            out.pages,
            out.pages_skipped,
            out.char_count()
        );

        out
    }

    fn load(&self, doc: &UploadedDocument) -> Result<Document> {
        let pdf = Document::load_mem(&doc.bytes)
            .map_err(|e| DocQaError::ExtractionFailed(format!("{}: {e}", doc.name)))?;

        if pdf.is_encrypted() {
            return Err(DocQaError::ExtractionFailed(format!(
                "{}: document is encrypted",
                doc.name
            )));
        }

        Ok(pdf)
    }
}
