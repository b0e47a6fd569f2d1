use crate::config::{API_KEY_ENV_VAR, ResponderConfig, ResponderProvider, resolve_api_key};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

mod chat_completions;
pub use chat_completions::ChatCompletionsResponder;

/// Produces a conversational reply for one user utterance.
///
/// The conversation context is owned by the caller: implementations read the
/// prior context and hand back the extended one, so a failed turn leaves the
/// caller's context untouched.
pub trait Responder {
    fn respond(
        &self,
        utterance: &str,
        context: &Conversation,
    ) -> Result<(String, Conversation), AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

/// Running chat history, capped at `max_messages` (oldest dropped first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl Conversation {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages to send for the next turn: the history plus the new utterance.
    pub fn prompt_for(&self, utterance: &str) -> Vec<ChatMessage> {
        let mut prompt = self.messages.clone();
        prompt.push(ChatMessage::user(utterance));
        prompt
    }

    pub fn with_exchange(&self, utterance: &str, reply: &str) -> Self {
        let mut messages = self.messages.clone();
        messages.push(ChatMessage::user(utterance));
        messages.push(ChatMessage::assistant(reply));

        let overflow = messages.len().saturating_sub(self.max_messages);
        messages.drain(..overflow);

        Self {
            messages,
            max_messages: self.max_messages,
        }
    }
}

pub fn responder_from_config(config: &ResponderConfig) -> Result<Box<dyn Responder>, AppError> {
    responder_from_parts(config, std::env::var(API_KEY_ENV_VAR).ok())
}

/// Like `responder_from_config`, with the `TASKBOT_API_KEY` value passed in.
pub fn responder_from_parts(
    config: &ResponderConfig,
    env_key: Option<String>,
) -> Result<Box<dyn Responder>, AppError> {
    let api_key = match config.provider {
        ResponderProvider::Hosted => Some(resolve_api_key(env_key, config)?),
        ResponderProvider::Local => None,
    };

    tracing::debug!(
        provider = ?config.provider,
        model = %config.model,
        base_url = %config.base_url,
        "responder configured"
    );
    Ok(Box::new(ChatCompletionsResponder::new(config, api_key)))
}
