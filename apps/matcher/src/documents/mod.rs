//! Document extraction and resume discovery.
//!
//! `extract_text` turns a supported file into raw text. `discover_resumes` walks
//! a folder for candidates and `load_resumes` extracts, redacts and normalises
//! each one, recording (not failing on) documents that cannot be read.

mod docx;
mod pdf;
mod rtf;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::text::{normalize_text, redact_pii};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("docx error: {0}")]
    Docx(String),

    #[error("pdf error: {0}")]
    Pdf(String),
}

/// File formats the extractor understands, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Docx,
    Pdf,
    Rtf,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" | "md" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "rtf" => Some(Self::Rtf),
            _ => None,
        }
    }
}

/// Extracts raw text from a document based on its extension.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        ExtractError::UnsupportedFormat(ext)
    })?;

    match format {
        DocumentFormat::PlainText => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        DocumentFormat::Docx => docx::read_docx(path),
        DocumentFormat::Pdf => pdf::read_pdf(path),
        DocumentFormat::Rtf => Ok(rtf::rtf_to_text(&std::fs::read(path)?)),
    }
}

/// Recursively lists files with a supported extension, in path order.
pub fn discover_resumes(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, files)?;
        } else if DocumentFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    Ok(())
}

/// One candidate document. Built once during loading and never mutated.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub path: PathBuf,
    /// File name without its extension.
    pub name: String,
    pub raw: String,
    pub redacted: String,
    pub normalized: String,
}

impl ResumeDocument {
    pub fn from_text(path: PathBuf, raw: String) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let redacted = redact_pii(&raw);
        let normalized = normalize_text(&raw);
        Self {
            path,
            name,
            raw,
            redacted,
            normalized,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadedResumes {
    pub documents: Vec<ResumeDocument>,
    pub skipped: Vec<SkippedDocument>,
}

/// Extracts every file, keeping the ones that succeed and recording the rest.
pub fn load_resumes(paths: &[PathBuf]) -> LoadedResumes {
    let mut loaded = LoadedResumes::default();

    for path in paths {
        match extract_text(path) {
            Ok(raw) => {
                let doc = ResumeDocument::from_text(path.clone(), raw);
                debug!("Loaded {} ({} chars)", path.display(), doc.raw.chars().count());
                loaded.documents.push(doc);
            }
            Err(e) => {
                warn!("Skipping unreadable resume {}: {e}", path.display());
                loaded.skipped.push(SkippedDocument {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    loaded
}
