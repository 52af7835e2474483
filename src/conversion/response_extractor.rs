//! Chat completion response handling

use crate::core::client::ClientError;
use crate::models::openai::ChatCompletionResponse;

/// Return the message content of the first choice
///
/// # Errors
///
/// Returns `ClientError::MissingContent` when there are no choices or the
/// first choice carries no string content.
pub fn extract_content(response: &ChatCompletionResponse) -> Result<&str, ClientError> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.as_ref())
        .and_then(|message| message.content.as_deref())
        .ok_or(ClientError::MissingContent)
}
