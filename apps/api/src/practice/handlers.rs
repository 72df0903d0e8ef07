//! Axum route handlers for the practice features.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::code_runner::Language;
use crate::errors::AppError;
use crate::practice::{
    answer_feedback, aptitude_feedback, aptitude_question, communication_feedback,
    communication_topic, generate_question, mock_test_report, technical_question,
    AptitudeQuestion, CommunicationTopic, SpokenAnswer, TechnicalQuestion,
};
use crate::state::AppState;
use crate::transcription::Transcript;
use crate::upload::UploadForm;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    pub topic: Option<String>,
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TechnicalQuestionRequest {
    pub topic: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AptitudeFeedbackRequest {
    #[serde(default)]
    pub results: Value,
}

#[derive(Debug, Deserialize)]
pub struct FinalReportRequest {
    #[serde(default)]
    pub all_round_results: Value,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Null, blank strings and empty collections all count as "not provided".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Anything other than `java` runs as Python.
fn parse_language(raw: &str) -> Language {
    if raw.trim().eq_ignore_ascii_case("java") {
        Language::Java
    } else {
        Language::Python
    }
}

/// Reads the recorded answer plus its prompt field (`question`) and transcribes it.
struct RecordedAnswer {
    prompt: String,
    expressions: Option<String>,
    transcript: Transcript,
}

impl RecordedAnswer {
    async fn read(
        state: &AppState,
        multipart: Multipart,
        missing_message: &str,
    ) -> Result<Self, AppError> {
        let mut form = UploadForm::read(multipart).await?;
        let audio = form
            .take_file("audio_file")
            .ok_or_else(|| AppError::Validation("No audio file part".to_string()))?;
        if audio.file_name.trim().is_empty() {
            return Err(AppError::Validation(missing_message.to_string()));
        }
        let prompt = required(form.text("question"), missing_message)?.to_string();
        let expressions = form.text("expressions").map(str::to_string);

        let transcript = state.transcriber.transcribe(audio.bytes).await?;
        Ok(Self {
            prompt,
            expressions,
            transcript,
        })
    }

    fn spoken(&self) -> SpokenAnswer<'_> {
        SpokenAnswer {
            text: &self.transcript.text,
            duration_seconds: self.transcript.duration_seconds,
            expressions: self.expressions.as_deref(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-question
pub async fn handle_generate_question(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let topic = required(request.topic.as_deref(), "Missing 'topic' field")?;
    let question =
        generate_question(state.llm.as_ref(), topic, request.resume_text.as_deref()).await?;
    Ok(Json(QuestionResponse { question }))
}

/// POST /interview
///
/// Multipart: `audio_file`, `question`, optional `expressions`.
pub async fn handle_interview_feedback(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FeedbackResponse>, AppError> {
    let answer = RecordedAnswer::read(&state, multipart, "Missing file or question").await?;
    let feedback = answer_feedback(state.llm.as_ref(), &answer.prompt, &answer.spoken()).await?;
    Ok(Json(FeedbackResponse { feedback }))
}

/// POST /communication-feedback
///
/// Multipart: `audio_file`, `question` (the speech topic), optional `expressions`.
pub async fn handle_communication_feedback(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FeedbackResponse>, AppError> {
    let speech = RecordedAnswer::read(&state, multipart, "Missing file or topic").await?;
    let feedback =
        communication_feedback(state.llm.as_ref(), &speech.prompt, &speech.spoken()).await?;
    Ok(Json(FeedbackResponse { feedback }))
}

/// GET /communication-topic
pub async fn handle_communication_topic(
    State(state): State<AppState>,
) -> Result<Json<CommunicationTopic>, AppError> {
    Ok(Json(communication_topic(state.llm.as_ref()).await?))
}

/// POST /aptitude-question
pub async fn handle_aptitude_question(
    State(state): State<AppState>,
    Json(request): Json<TopicRequest>,
) -> Result<Json<AptitudeQuestion>, AppError> {
    let topic = required(request.topic.as_deref(), "Missing 'topic' field")?;
    Ok(Json(aptitude_question(state.llm.as_ref(), topic).await?))
}

/// POST /aptitude-feedback
pub async fn handle_aptitude_feedback(
    State(state): State<AppState>,
    Json(request): Json<AptitudeFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    if is_blank(&request.results) {
        return Err(AppError::Validation("Missing 'results' data".to_string()));
    }
    let feedback = aptitude_feedback(state.llm.as_ref(), &request.results).await?;
    Ok(Json(FeedbackResponse { feedback }))
}

/// POST /technical-question
pub async fn handle_technical_question(
    State(state): State<AppState>,
    Json(request): Json<TechnicalQuestionRequest>,
) -> Result<Json<TechnicalQuestion>, AppError> {
    const MISSING: &str = "Missing 'topic' or 'language' field";
    let topic = required(request.topic.as_deref(), MISSING)?;
    let language = parse_language(required(request.language.as_deref(), MISSING)?);
    Ok(Json(
        technical_question(state.llm.as_ref(), topic, language).await?,
    ))
}

/// POST /generate-final-report
pub async fn handle_final_report(
    State(state): State<AppState>,
    Json(request): Json<FinalReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    if is_blank(&request.all_round_results) {
        return Err(AppError::Validation(
            "Missing 'all_round_results' data".to_string(),
        ));
    }
    let report = mock_test_report(state.llm.as_ref(), &request.all_round_results).await?;
    Ok(Json(ReportResponse { report }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some(" Rust "), "m").unwrap(), "Rust");
        assert!(matches!(required(Some("   "), "m"), Err(AppError::Validation(m)) if m == "m"));
        assert!(required(None, "m").is_err());
    }

    #[test]
    fn test_is_blank_matches_falsy_payloads() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!("  ")));
        assert!(!is_blank(&json!([{"correct": false}])));
        assert!(!is_blank(&json!(0)));
    }

    #[test]
    fn test_parse_language_defaults_to_python() {
        assert_eq!(parse_language("java"), Language::Java);
        assert_eq!(parse_language("Java"), Language::Java);
        assert_eq!(parse_language("python"), Language::Python);
        assert_eq!(parse_language("cobol"), Language::Python);
    }

    #[test]
    fn test_missing_results_deserialize_as_null() {
        let request: AptitudeFeedbackRequest = serde_json::from_str("{}").unwrap();
        assert!(is_blank(&request.results));
    }
}
