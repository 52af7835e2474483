//! News article record
//!
//! Articles arrive as news-please style JSON documents. Only four fields are
//! read; everything else in the document is ignored.

use crate::core::constants::UNKNOWN;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors raised while loading an article
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    #[error("Failed to read article file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse article file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The article fields used to build a prompt
///
/// Absent or null fields hold [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    #[serde(default = "unknown", deserialize_with = "field_text")]
    pub title: String,
    #[serde(default = "unknown", deserialize_with = "field_text")]
    pub source_domain: String,
    #[serde(default = "unknown", deserialize_with = "field_text")]
    pub date_publish: String,
    #[serde(default = "unknown", deserialize_with = "field_text")]
    pub maintext: String,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Render a field value as prompt text
///
/// Strings are kept verbatim, null maps to the sentinel and any other value
/// is written as compact JSON.
fn field_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => unknown(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

impl Article {
    /// Load an article from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ArticleError::Read` if the file cannot be read and
    /// `ArticleError::Parse` if it is not a JSON object.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArticleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArticleError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let article = Self::from_json_str(&content).map_err(|source| ArticleError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            path = %path.display(),
            missing = ?article.missing_fields(),
            maintext_chars = article.maintext.chars().count(),
            "Loaded article"
        );

        Ok(article)
    }

    /// Parse an article from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom(
                "article document must be a JSON object",
            ));
        }
        serde_json::from_value(value)
    }

    /// Names of the fields that fell back to the sentinel
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("source_domain", &self.source_domain),
            ("date_publish", &self.date_publish),
            ("maintext", &self.maintext),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_str() == UNKNOWN)
        .map(|(name, _)| name)
        .collect()
    }
}
