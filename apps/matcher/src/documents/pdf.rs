use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use pdf_extract::{output_doc_page, Document, PlainTextOutput};
use tracing::{debug, warn};

use super::ExtractError;

/// Extracts plain text from a PDF, page by page, joining pages with newlines.
/// Pages that fail or produce no text are skipped; a document the parser
/// cannot open at all is an error.
pub fn read_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let doc = load_document(&bytes)?;

    let mut pages = Vec::new();
    for page_num in doc.get_pages().into_keys() {
        match extract_page(&doc, page_num) {
            Ok(text) => pages.push((page_num, text)),
            Err(reason) => warn!("Skipping page {page_num} of {}: {reason}", path.display()),
        }
    }

    Ok(join_pages(pages, path))
}

// pdf-extract panics on some malformed inputs instead of returning an error.
fn load_document(bytes: &[u8]) -> Result<Document, ExtractError> {
    let mut doc = panic::catch_unwind(|| Document::load_mem(bytes))
        .map_err(|_| ExtractError::Pdf("parser aborted on malformed document".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    if doc.is_encrypted() {
        doc.decrypt("")
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    }
    Ok(doc)
}

fn extract_page(doc: &Document, page_num: u32) -> Result<String, String> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut text = String::new();
        {
            let mut output = PlainTextOutput::new(&mut text);
            output_doc_page(doc, &mut output, page_num)?;
        }
        Ok::<_, pdf_extract::OutputError>(text)
    }))
    .map_err(|_| "parser aborted on malformed page".to_string())?
    .map_err(|e| e.to_string())
}

fn join_pages(pages: Vec<(u32, String)>, path: &Path) -> String {
    let mut out = String::new();
    for (page_num, page) in pages {
        if page.trim().is_empty() {
            debug!("Skipping empty page {page_num} of {}", path.display());
            continue;
        }
        out.push_str(&page);
        out.push('\n');
    }
    out
}
