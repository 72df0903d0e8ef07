//! LLM client: the single point of entry for all Gemini API calls in PrepMate.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Feature modules depend on the `LanguageModel` trait; `GeminiClient` is the
//! production implementation wired into `AppState`.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod testing;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in PrepMate.
pub const MODEL: &str = "gemini-flash-latest";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No JSON object found in model output")]
    NoJson,

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Short message safe to show to end users. Full detail stays in the logs.
    pub fn user_message(&self) -> String {
        let detail = self.to_string();
        let lowered = detail.to_lowercase();
        match self {
            LlmError::RateLimited { .. } | LlmError::Api { status: 429, .. } => {
                "API rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            _ if lowered.contains("rate limit") => {
                "API rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            LlmError::Api { status: 500, .. } => {
                "The AI service had a temporary internal error. Please try again.".to_string()
            }
            _ if lowered.contains("an internal error") => {
                "The AI service had a temporary internal error. Please try again.".to_string()
            }
            LlmError::EmptyContent => "The AI failed to generate a response. \
                This may be due to safety filters. Please try again."
                .to_string(),
            LlmError::NoJson | LlmError::Parse(_) => {
                "The AI returned an invalid response. Please try again.".to_string()
            }
            _ => format!("An unexpected error occurred in the AI logic: {detail}"),
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. } | LlmError::Api { status: 429, .. }
        )
    }
}

/// Author of a prior turn as the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
}

impl GenerationOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
        }
    }
}

/// The language model gateway. Returns the generated text, which may be empty
/// when the provider blocks or drops the candidate; callers decide whether
/// empty output is recoverable.
///
/// Carried in `AppState` as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        history: &[ChatMessage],
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError>;
}

/// Single-shot generation that treats empty output as an error.
pub async fn generate_text(llm: &dyn LanguageModel, prompt: &str) -> Result<String, LlmError> {
    let text = llm
        .generate(&[], prompt, GenerationOptions::default())
        .await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text.to_string())
}

/// Calls the LLM and deserializes the reply as JSON.
/// The prompt must instruct the model to return a JSON object; fenced or
/// chatty replies are tolerated by re-extracting the outermost object.
pub async fn generate_json<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    prompt: &str,
) -> Result<T, LlmError> {
    let text = generate_text(llm, prompt).await?;
    parse_json_reply(&text)
}

pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let candidate = strip_json_fences(text);
    if let Ok(value) = serde_json::from_str(candidate) {
        return Ok(value);
    }
    let object = extract_json_object(candidate).ok_or_else(|| {
        warn!("No JSON object found in model output: {text}");
        LlmError::NoJson
    })?;
    serde_json::from_str(object).map_err(|e| {
        warn!("Failed to decode JSON from model output: {e}; output was: {text}");
        LlmError::Parse(e)
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate; empty when the candidate was
    /// blocked or carried no text parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client used by all services in PrepMate.
/// Wraps the `generateContent` endpoint with retry logic.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        history: &[ChatMessage],
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<GeminiResponse, LlmError> {
        let request_body = build_request(history, prompt, options);
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
            }

            let gemini_response: GeminiResponse = response.json().await?;

            if let Some(usage) = &gemini_response.usage_metadata {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }
            if let Some(reason) = gemini_response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .filter(|r| *r != "STOP")
            {
                warn!("LLM candidate finished with reason {reason}");
            }

            return Ok(gemini_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(
        &self,
        history: &[ChatMessage],
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        Ok(self.call(history, prompt, options).await?.text())
    }
}

fn build_request<'a>(
    history: &'a [ChatMessage],
    prompt: &'a str,
    options: GenerationOptions,
) -> GeminiRequest<'a> {
    let mut contents: Vec<GeminiContent<'a>> = history
        .iter()
        .map(|m| GeminiContent {
            role: m.role.as_str(),
            parts: vec![GeminiPart { text: &m.text }],
        })
        .collect();
    contents.push(GeminiContent {
        role: ChatRole::User.as_str(),
        parts: vec![GeminiPart { text: prompt }],
    });

    GeminiRequest {
        contents,
        generation_config: options
            .temperature
            .map(|temperature| GeminiGenerationConfig { temperature }),
    }
}

fn error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Best-guess JSON object: from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
