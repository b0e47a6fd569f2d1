use super::{ChatMessage, Conversation, Responder};
use crate::config::ResponderConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blocking client for an OpenAI-style `/chat/completions` endpoint, either
/// the hosted service or a local server fronting a pretrained model.
pub struct ChatCompletionsResponder {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    /// Legacy completion-style payloads carry the reply here instead.
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsResponder {
    pub fn new(config: &ResponderConfig, api_key: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self {
            agent,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        }
    }

    fn send(&self, messages: &[ChatMessage]) -> Result<ChatCompletionResponse, AppError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(key) = self.api_key.as_deref() {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        let response = match request.send_json(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let detail = response.into_string().unwrap_or_default();
                return Err(AppError::responder_unavailable(format!(
                    "HTTP {status}: {}",
                    detail.trim()
                )));
            }
            Err(err) => return Err(AppError::responder_unavailable(err.to_string())),
        };

        response
            .into_json()
            .map_err(|err| AppError::responder_unavailable(format!("invalid response: {err}")))
    }
}

impl Responder for ChatCompletionsResponder {
    fn respond(
        &self,
        utterance: &str,
        context: &Conversation,
    ) -> Result<(String, Conversation), AppError> {
        let prompt = context.prompt_for(utterance);
        tracing::debug!(endpoint = %self.endpoint, messages = prompt.len(), "requesting reply");

        let response = self.send(&prompt)?;
        let reply = extract_reply(response)?;

        Ok((reply.clone(), context.with_exchange(utterance, &reply)))
    }
}

fn extract_reply(response: ChatCompletionResponse) -> Result<String, AppError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::responder_unavailable("response contained no choices"))?;

    choice
        .message
        .and_then(|message| message.content)
        .or(choice.text)
        .map(|reply| reply.trim().to_string())
        .ok_or_else(|| AppError::responder_unavailable("response contained no reply text"))
}
