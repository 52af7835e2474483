//! Prompt construction
//!
//! The system instruction is fixed; the user message interpolates the
//! article fields in a fixed order.

use crate::models::article::Article;

/// Instruction asking for a short summary followed by an `events` array
pub const SYSTEM_PROMPT: &str = concat!(
    "You are a concise AI system that reads the given article. ",
    "First, produce a short, natural-language summary (like a mini-article) that includes: ",
    "  - A brief title or heading ",
    "  - 1~2 paragraphs summarizing the main points. ",
    "Keep it objective, minimal, and factual. ",
    "\n\n",
    "Then, output a structured JSON array called 'events', where each element has these fields: ",
    "actor, action, object, time, location, quantity, source, confidence, additional_context. ",
    "If any field is not found in the text, set it to 'UNKNOWN'. ",
    "If the text describes multiple events, output multiple JSON objects in the array. ",
    "Ensure the JSON is valid and that the summary is separate, not inside the JSON. ",
    "No speculation or guessing; only use information found in the article. ",
);

/// The two message bodies sent for one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Format the article metadata and body as the user message
pub fn user_message(article: &Article) -> String {
    format!(
        "Article Title: {}\nSource: {}\nPublished: {}\n\nMain Text:\n{}",
        article.title, article.source_domain, article.date_publish, article.maintext
    )
}

/// Build the system and user messages for an article
pub fn build_prompt(article: &Article) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: user_message(article),
    }
}
