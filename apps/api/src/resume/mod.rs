//! Resume text extraction for the resume-based practice flows.
//!
//! The extracted text is handed back to the client, which sends it with every
//! resume-based request; nothing is kept server-side.

use std::io::Write;

use thiserror::Error;
use tracing::{info, warn};

pub mod handlers;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Invalid file type. Please upload a PDF.")]
    NotPdf,

    #[error("Could not extract text from PDF.")]
    Unreadable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts `.pdf` names (any case) whose content starts with the PDF header.
pub fn ensure_pdf(file_name: &str, bytes: &[u8]) -> Result<(), ResumeError> {
    let has_extension = file_name.to_ascii_lowercase().ends_with(".pdf");
    if has_extension && bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(ResumeError::NotPdf)
    }
}

/// Extracts plain text from a PDF. The bytes are staged in a temp file that is
/// removed when this returns; the parser runs on the blocking pool because it
/// is CPU-bound and may panic on malformed input.
pub async fn extract_pdf_text(bytes: &[u8]) -> Result<String, ResumeError> {
    let mut staged = tempfile::Builder::new()
        .prefix("prepmate-resume-")
        .suffix(".pdf")
        .tempfile()?;
    staged.write_all(bytes)?;
    staged.flush()?;

    let path = staged.path().to_path_buf();
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path).map_err(|e| e.to_string()))
            .await;
    drop(staged);

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            return Err(ResumeError::Unreadable);
        }
        Err(e) => {
            warn!("PDF extraction task aborted: {e}");
            return Err(ResumeError::Unreadable);
        }
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ResumeError::Unreadable);
    }
    info!("Extracted {} characters of resume text", text.len());
    Ok(text)
}
