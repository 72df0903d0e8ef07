use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::resume::{ensure_pdf, extract_pdf_text, ResumeError};
use crate::upload::{UploadForm, UploadedFile};

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub message: String,
    pub resume_text: String,
}

impl From<ResumeError> for AppError {
    fn from(e: ResumeError) -> Self {
        match e {
            ResumeError::NotPdf => AppError::Validation(e.to_string()),
            ResumeError::Unreadable => AppError::UnprocessableEntity(e.to_string()),
            ResumeError::Io(io) => AppError::Internal(io.into()),
        }
    }
}

fn resume_file(form: &mut UploadForm) -> Result<UploadedFile, AppError> {
    let file = form
        .take_file("resume_file")
        .ok_or_else(|| AppError::Validation("No resume file part".to_string()))?;
    if file.file_name.trim().is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }
    ensure_pdf(&file.file_name, &file.bytes)?;
    Ok(file)
}

/// POST /upload-practice-resume
pub async fn handle_upload_practice_resume(
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = resume_file(&mut form)?;
    let resume_text = extract_pdf_text(&file.bytes).await?;

    Ok(Json(ResumeUploadResponse {
        message: "Resume processed successfully.".to_string(),
        resume_text,
    }))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn form_with(file_name: &str, bytes: &'static [u8]) -> UploadForm {
        UploadForm::from_parts(
            &[],
            vec![(
                "resume_file",
                UploadedFile {
                    file_name: file_name.into(),
                    bytes: Bytes::from_static(bytes),
                },
            )],
        )
    }

    #[test]
    fn test_missing_part_is_rejected() {
        let mut form = UploadForm::from_parts(&[], vec![]);
        match resume_file(&mut form) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "No resume file part"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_blank_name_and_wrong_type_are_rejected() {
        assert!(matches!(
            resume_file(&mut form_with("", b"%PDF-1.4")),
            Err(AppError::Validation(msg)) if msg == "No selected file"
        ));
        assert!(matches!(
            resume_file(&mut form_with("cv.txt", b"hello")),
            Err(AppError::Validation(msg)) if msg == "Invalid file type. Please upload a PDF."
        ));
    }

    #[test]
    fn test_unreadable_maps_to_422() {
        assert!(matches!(
            AppError::from(ResumeError::Unreadable),
            AppError::UnprocessableEntity(_)
        ));
    }
}
