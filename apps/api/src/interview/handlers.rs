//! Axum route handlers for the scripted interviews.
//!
//! Every variant shares one multipart contract: `conversation_history` (JSON
//! list of turns), optional `audio_file` with the answer, optional
//! `resume_text` and `topic`. The legacy per-variant paths and the generic
//! `/api/v1/interviews/:variant/turn` route all land in `run_turn`.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::interview::conversation::advance;
use crate::interview::delivery::analyze;
use crate::interview::models::{ConversationTurnResult, InterviewContext, Turn};
use crate::interview::variants::InterviewVariant;
use crate::state::AppState;
use crate::upload::UploadForm;

pub fn parse_history(raw: Option<&str>) -> Result<Vec<Turn>, AppError> {
    let raw = raw.ok_or_else(|| AppError::Validation("Missing conversation history.".to_string()))?;
    serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid conversation history: {e}")))
}

pub async fn run_turn(
    state: &AppState,
    variant: InterviewVariant,
    mut form: UploadForm,
) -> Result<ConversationTurnResult, AppError> {
    let history = parse_history(form.text("conversation_history"))?;
    let mut context = InterviewContext {
        topic: form.text("topic").map(str::to_string),
        resume_text: form.text("resume_text").map(str::to_string),
        delivery: None,
    };
    // Fail before paying for a transcription.
    variant.config().validate_context(&context)?;

    let audio = form
        .take_file("audio_file")
        .filter(|f| !f.file_name.trim().is_empty());

    let new_answer = match audio {
        Some(audio) => {
            let transcript = state.transcriber.transcribe(audio.bytes).await?;
            info!(
                "Interview {variant:?}: transcribed answer ({} chars)",
                transcript.text.len()
            );
            context.delivery = Some(analyze(&transcript.text, transcript.duration_seconds));
            Some(transcript.text)
        }
        None => None,
    };

    advance(state.llm.as_ref(), variant, &context, history, new_answer).await
}

/// POST /api/v1/interviews/:variant/turn
pub async fn handle_interview_turn(
    State(state): State<AppState>,
    Path(variant): Path<InterviewVariant>,
    multipart: Multipart,
) -> Result<Json<ConversationTurnResult>, AppError> {
    let form = UploadForm::read(multipart).await?;
    Ok(Json(run_turn(&state, variant, form).await?))
}

/// POST /managerial-conversation
pub async fn handle_managerial_conversation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConversationTurnResult>, AppError> {
    let form = UploadForm::read(multipart).await?;
    Ok(Json(run_turn(&state, InterviewVariant::Managerial, form).await?))
}

/// POST /hr-conversation
pub async fn handle_hr_conversation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConversationTurnResult>, AppError> {
    let form = UploadForm::read(multipart).await?;
    Ok(Json(run_turn(&state, InterviewVariant::Hr, form).await?))
}

/// POST /resume-conversation
pub async fn handle_resume_conversation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConversationTurnResult>, AppError> {
    let form = UploadForm::read(multipart).await?;
    Ok(Json(run_turn(&state, InterviewVariant::ResumeBased, form).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::state::testing::test_state;
    use crate::transcription::testing::FixedTranscriber;
    use crate::upload::UploadedFile;

    fn audio(bytes: &'static [u8]) -> (&'static str, UploadedFile) {
        (
            "audio_file",
            UploadedFile {
                file_name: "answer.webm".into(),
                bytes: Bytes::from_static(bytes),
            },
        )
    }

    #[test]
    fn test_parse_history_requires_field() {
        assert!(matches!(
            parse_history(None),
            Err(AppError::Validation(m)) if m == "Missing conversation history."
        ));
        assert!(parse_history(Some("not json")).is_err());
        assert_eq!(parse_history(Some("[]")).unwrap(), Vec::<Turn>::new());
    }

    #[tokio::test]
    async fn test_opening_turn_without_audio() {
        let llm = Arc::new(ScriptedModel::replying(&["Tell me about a time you led a project."]));
        let transcriber = Arc::new(FixedTranscriber::new("unused", 1.0));
        let state = test_state(llm.clone(), transcriber.clone());

        let form = UploadForm::from_parts(&[("conversation_history", "[]")], vec![]);
        let result = run_turn(&state, InterviewVariant::Managerial, form).await.unwrap();

        assert_eq!(result.ai_response, "Tell me about a time you led a project.");
        assert_eq!(result.user_transcript, None);
        assert_eq!(result.updated_history.len(), 1);
        assert_eq!(transcriber.calls(), 0);
    }

    #[tokio::test]
    async fn test_audio_answer_is_transcribed_and_appended() {
        let llm = Arc::new(ScriptedModel::replying(&["Why was that hard?"]));
        let transcriber = Arc::new(FixedTranscriber::new("I led the migration", 2.0));
        let state = test_state(llm.clone(), transcriber.clone());

        let history = r#"[{"role":"ai","content":"Tell me about yourself."}]"#;
        let form = UploadForm::from_parts(&[("conversation_history", history)], vec![audio(b"webm")]);
        let result = run_turn(&state, InterviewVariant::Hr, form).await.unwrap();

        assert_eq!(transcriber.calls(), 1);
        assert_eq!(result.user_transcript.as_deref(), Some("I led the migration"));
        assert_eq!(
            result.updated_history,
            vec![
                Turn::ai("Tell me about yourself."),
                Turn::user("I led the migration"),
                Turn::ai("Why was that hard?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_resume_variant_rejects_before_transcribing() {
        let llm = Arc::new(ScriptedModel::default());
        let transcriber = Arc::new(FixedTranscriber::new("answer", 1.0));
        let state = test_state(llm.clone(), transcriber.clone());

        let form = UploadForm::from_parts(&[("conversation_history", "[]")], vec![audio(b"webm")]);
        let result = run_turn(&state, InterviewVariant::ResumeBased, form).await;

        assert!(matches!(result, Err(AppError::Validation(m)) if m == "Missing resume text."));
        assert_eq!(transcriber.calls(), 0);
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_audio_surfaces_transcription_error() {
        let llm = Arc::new(ScriptedModel::default());
        let transcriber = Arc::new(FixedTranscriber::new("answer", 1.0));
        let state = test_state(llm, transcriber);

        let history = r#"[{"role":"ai","content":"Q1"}]"#;
        let form = UploadForm::from_parts(&[("conversation_history", history)], vec![audio(b"")]);
        let result = run_turn(&state, InterviewVariant::Managerial, form).await;

        assert!(matches!(result, Err(AppError::Transcription(_))));
    }
}
