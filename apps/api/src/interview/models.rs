use serde::{Deserialize, Serialize};

use crate::interview::delivery::DeliverySummary;
use crate::llm_client::ChatMessage;

/// Author of a turn. `System` is a one-shot instruction override that the
/// client appends as the last turn; it is consumed before the step is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ai,
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// The step index of a conversation is the number of interviewer turns so far.
pub fn step_index(history: &[Turn]) -> usize {
    history.iter().filter(|t| t.role == Role::Ai).count()
}

/// Removes and returns a trailing `system` turn, if any.
pub fn take_override(history: &mut Vec<Turn>) -> Option<String> {
    match history.last() {
        Some(turn) if turn.role == Role::System => history.pop().map(|t| t.content),
        _ => None,
    }
}

/// Maps turns to the model's chat format: interviewer turns become model
/// turns, everything else is sent as user input.
pub fn to_chat_messages(history: &[Turn]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|t| match t.role {
            Role::Ai => ChatMessage::model(t.content.clone()),
            Role::User | Role::System => ChatMessage::user(t.content.clone()),
        })
        .collect()
}

/// `role: content` transcript lines used by the closing report.
pub fn transcript_text(history: &[Turn]) -> String {
    history
        .iter()
        .map(|t| {
            let role = match t.role {
                Role::Ai => "ai",
                Role::User => "user",
                Role::System => "system",
            };
            format!("{role}: {}", t.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-request inputs some variants need besides the history.
#[derive(Debug, Clone, Default)]
pub struct InterviewContext {
    /// Topic for the general single-question flow.
    pub topic: Option<String>,
    /// Extracted resume text, supplied by the client on every request.
    pub resume_text: Option<String>,
    /// Delivery analysis of the answer submitted with this request.
    pub delivery: Option<DeliverySummary>,
}

/// Outcome of one `advance` call, returned to the client as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurnResult {
    /// Next interviewer question, or the closing notice on the terminal call.
    pub ai_response: String,
    pub user_transcript: Option<String>,
    pub updated_history: Vec<Turn>,
    pub session_complete: bool,
    pub final_report: Option<String>,
}
