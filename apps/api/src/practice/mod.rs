//! Single-shot practice features: question generation, answer and speech
//! coaching, aptitude and coding drills, and the full mock-test report.
//!
//! Every function is one model call. Markdown replies are returned verbatim;
//! JSON replies are parsed into typed structs so malformed output surfaces as
//! `LlmError::NoJson`/`Parse` instead of reaching the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::code_runner::{Language, TestCase};
use crate::errors::AppError;
use crate::interview::delivery::{analyze, audio_summary, summarize_expressions};
use crate::llm_client::prompts::{fill_template, JSON_REPLY_INSTRUCTION, MARKDOWN_REPORT_HEADER};
use crate::llm_client::{generate_json, generate_text, LanguageModel, LlmError};

pub mod handlers;
pub mod prompts;

/// Topic label that switches question generation to the candidate's resume.
pub const RESUME_BASED_TOPIC: &str = "Resume-Based";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationTopic {
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AptitudeQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub solution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalQuestion {
    pub question_title: String,
    pub problem_statement: String,
    pub starter_code: String,
    pub test_cases: Vec<TestCase>,
    pub model_solution: String,
}

/// A spoken answer after transcription.
#[derive(Debug, Clone)]
pub struct SpokenAnswer<'a> {
    pub text: &'a str,
    pub duration_seconds: f64,
    /// Raw JSON list of expression labels as sent by the client.
    pub expressions: Option<&'a str>,
}

impl SpokenAnswer<'_> {
    fn delivery_blocks(&self) -> (String, String) {
        let delivery = analyze(self.text, self.duration_seconds);
        (
            audio_summary(Some(&delivery)),
            summarize_expressions(self.expressions),
        )
    }
}

/// One interview question for `topic`. The resume topic needs resume text.
pub async fn generate_question(
    llm: &dyn LanguageModel,
    topic: &str,
    resume_text: Option<&str>,
) -> Result<String, AppError> {
    let prompt = if topic == RESUME_BASED_TOPIC {
        let resume_text = resume_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Please upload a resume first.".to_string()))?;
        fill_template(prompts::RESUME_QUESTION, &[("resume_text", resume_text)])
    } else {
        fill_template(prompts::TOPIC_QUESTION, &[("topic", topic)])
    };

    info!("Generating practice question for topic '{topic}'");
    Ok(generate_text(llm, &prompt).await?)
}

/// STAR-method coaching for a spoken answer to `question`.
pub async fn answer_feedback(
    llm: &dyn LanguageModel,
    question: &str,
    answer: &SpokenAnswer<'_>,
) -> Result<String, AppError> {
    let (audio, expressions) = answer.delivery_blocks();
    let prompt = fill_template(
        prompts::ANSWER_FEEDBACK,
        &[
            ("output_format", MARKDOWN_REPORT_HEADER),
            ("audio_summary", &audio),
            ("expression_summary", &expressions),
            ("question", question),
            ("answer", answer.text),
        ],
    );

    Ok(generate_text(llm, &prompt).await?)
}

pub async fn communication_topic(llm: &dyn LanguageModel) -> Result<CommunicationTopic, AppError> {
    let prompt = fill_template(
        prompts::COMMUNICATION_TOPIC,
        &[("json_instruction", JSON_REPLY_INSTRUCTION)],
    );
    let topic: CommunicationTopic = generate_json(llm, &prompt).await?;
    if topic.topic.trim().is_empty() {
        return Err(LlmError::EmptyContent.into());
    }
    Ok(topic)
}

/// Coaching for a one-minute speech on `topic`.
pub async fn communication_feedback(
    llm: &dyn LanguageModel,
    topic: &str,
    speech: &SpokenAnswer<'_>,
) -> Result<String, AppError> {
    let (audio, expressions) = speech.delivery_blocks();
    let prompt = fill_template(
        prompts::COMMUNICATION_FEEDBACK,
        &[
            ("output_format", MARKDOWN_REPORT_HEADER),
            ("audio_summary", &audio),
            ("expression_summary", &expressions),
            ("topic", topic),
            ("answer", speech.text),
        ],
    );

    Ok(generate_text(llm, &prompt).await?)
}

/// Multiple-choice aptitude question. `mix` (any case) draws from all areas.
pub async fn aptitude_question(
    llm: &dyn LanguageModel,
    topic: &str,
) -> Result<AptitudeQuestion, AppError> {
    let topic_instruction = if topic.eq_ignore_ascii_case("mix") {
        prompts::APTITUDE_MIX.to_string()
    } else {
        format!("for the topic: \"{topic}\".")
    };
    let prompt = fill_template(
        prompts::APTITUDE_QUESTION,
        &[
            ("json_instruction", JSON_REPLY_INSTRUCTION),
            ("topic_instruction", &topic_instruction),
        ],
    );

    let question: AptitudeQuestion = generate_json(llm, &prompt).await?;
    if question.options.len() != 4 {
        warn!(
            "Aptitude question came back with {} options",
            question.options.len()
        );
    }
    Ok(question)
}

/// Markdown summary of a finished aptitude session.
pub async fn aptitude_feedback(llm: &dyn LanguageModel, results: &Value) -> Result<String, AppError> {
    let results_json = serde_json::to_string_pretty(results).map_err(anyhow::Error::from)?;
    let prompt = fill_template(prompts::APTITUDE_FEEDBACK, &[("results_json", &results_json)]);
    Ok(generate_text(llm, &prompt).await?)
}

/// Coding problem with stdin/stdout test cases for `language`.
pub async fn technical_question(
    llm: &dyn LanguageModel,
    topic: &str,
    language: Language,
) -> Result<TechnicalQuestion, AppError> {
    let topic_instruction = if topic == prompts::DSA_MIX_TOPIC {
        prompts::DSA_MIX.to_string()
    } else {
        format!("for the topic: \"{topic}\"")
    };
    let example = match language {
        Language::Python => prompts::PYTHON_EXAMPLE,
        Language::Java => prompts::JAVA_EXAMPLE,
    };
    let prompt = fill_template(
        prompts::TECHNICAL_QUESTION,
        &[
            ("json_instruction", JSON_REPLY_INSTRUCTION),
            ("example", example),
            ("language_name", language.display_name()),
            ("topic_instruction", &topic_instruction),
        ],
    );

    let question: TechnicalQuestion = generate_json(llm, &prompt).await?;
    if question.test_cases.is_empty() {
        warn!("Technical question '{}' has no test cases", question.question_title);
    }
    Ok(question)
}

/// Comprehensive Markdown report across every mock-test round.
pub async fn mock_test_report(
    llm: &dyn LanguageModel,
    all_round_results: &Value,
) -> Result<String, AppError> {
    let results_json =
        serde_json::to_string_pretty(all_round_results).map_err(anyhow::Error::from)?;
    let prompt = fill_template(prompts::MOCK_TEST_REPORT, &[("results_json", &results_json)]);
    Ok(generate_text(llm, &prompt).await?)
}
