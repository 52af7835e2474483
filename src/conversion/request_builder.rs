//! Prompt to chat completion request conversion

use crate::conversion::prompt::Prompt;
use crate::core::config::Config;
use crate::core::constants::role;
use crate::models::openai::{ChatCompletionRequest, ChatMessage};

/// Build the wire request for a prompt
///
/// The message list is always system then user. Model, temperature and
/// token limit come from the configuration only.
pub fn build_request(prompt: &Prompt, config: &Config) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage::new(role::SYSTEM, prompt.system.as_str()),
            ChatMessage::new(role::USER, prompt.user.as_str()),
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}
