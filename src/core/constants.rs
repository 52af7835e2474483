//! Shared constants
//!
//! Message roles, the missing-field sentinel and the built-in request
//! defaults.

/// Placeholder for article fields that are absent from the input
pub const UNKNOWN: &str = "UNKNOWN";

/// Message role constants
pub mod role {
    /// System role identifier
    pub const SYSTEM: &str = "system";

    /// User role identifier
    pub const USER: &str = "user";
}

/// Built-in request settings used when no settings file overrides them
pub mod defaults {
    /// Groq's OpenAI-compatible chat completion endpoint
    pub const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

    /// Model identifier
    pub const MODEL: &str = "mixtral-8x7b-32768";

    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.2;

    /// Upper bound on generated tokens (summary plus events JSON)
    pub const MAX_TOKENS: u32 = 500;

    /// Log level
    pub const LOG_LEVEL: &str = "info";

    /// Settings file looked up in the working directory
    pub const CONFIG_FILE: &str = "summarizer.toml";
}

/// Environment variable holding the bearer token
pub const API_KEY_ENV: &str = "API_KEY";
