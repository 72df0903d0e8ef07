//! In-memory `LanguageModel` for unit tests. Replies are consumed in order;
//! every call is recorded so tests can assert on prompts and history.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatMessage, GenerationOptions, LanguageModel, LlmError};

pub enum ScriptedReply {
    Text(String),
    Fail(LlmError),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub options: GenerationOptions,
}

#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn replying(texts: &[&str]) -> Self {
        let model = Self::default();
        for text in texts {
            model.push(ScriptedReply::Text(text.to_string()));
        }
        model
    }

    pub fn failing(error: LlmError) -> Self {
        let model = Self::default();
        model.push(ScriptedReply::Fail(error));
        model
    }

    pub fn push(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|c| c.prompt.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(
        &self,
        history: &[ChatMessage],
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            history: history.to_vec(),
            prompt: prompt.to_string(),
            options,
        });
        match self.replies.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(error)) => Err(error),
            None => Ok(String::new()),
        }
    }
}
