use crate::error::ExtractionError;
use lopdf::Document;
use regex::Regex;
use std::path::Path;

/// One page of extracted text. Numbering starts at 1 and follows the order
/// of pages in the source document.
#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait PdfExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError>;

    fn extract_file(&self, path: &Path) -> Result<Vec<PageText>, ExtractionError> {
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes)
    }
}

#[derive(Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError> {
        let document =
            Document::load_mem(bytes).map_err(|error| ExtractionError::Parse(error.to_string()))?;
        let blank_runs = Regex::new(r"\n{3,}")?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| ExtractionError::Parse(error.to_string()))?;

            let text = tidy_page_text(&text, &blank_runs);
            if !text.is_empty() {
                pages.push(PageText {
                    number: page_no,
                    text,
                });
            }
        }

        if pages.is_empty() {
            return Err(ExtractionError::NoText);
        }

        Ok(pages)
    }
}

/// Unify line endings and collapse runs of blank lines into a single
/// paragraph break, so the chunker sees clean boundaries.
fn tidy_page_text(text: &str, blank_runs: &Regex) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    blank_runs.replace_all(&unified, "\n\n").trim().to_string()
}
