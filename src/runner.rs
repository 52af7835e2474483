//! Single-article summarization run
//!
//! Load the article, build the request, send it once and write the first
//! choice's content. Every step fails fast; nothing is written to the output
//! unless the whole run succeeds.

use crate::conversion::prompt::build_prompt;
use crate::conversion::request_builder::build_request;
use crate::conversion::response_extractor::extract_content;
use crate::core::client::ChatClient;
use crate::core::config::Config;
use crate::models::article::Article;
use crate::models::openai::ChatCompletionRequest;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Load an article and turn it into a chat completion request
pub fn prepare_request(article_path: &Path, config: &Config) -> Result<ChatCompletionRequest> {
    let article = Article::from_file(article_path)?;
    let prompt = build_prompt(&article);
    Ok(build_request(&prompt, config))
}

/// Summarize one article and return the model's reply verbatim
///
/// # Errors
///
/// Returns error if the article cannot be loaded, the API key is missing,
/// the request fails or the response has no content.
pub async fn summarize_article(article_path: &Path, config: &Config) -> Result<String> {
    let request = prepare_request(article_path, config)?;

    let client = ChatClient::new(config.api_key()?, &config.api_url, config.request_timeout)?;

    info!(
        endpoint = client.endpoint(),
        model = %request.model,
        user_chars = request
            .messages
            .last()
            .map_or(0, |message| message.content.chars().count()),
        "Sending chat completion request"
    );

    let response = client
        .create_chat_completion(&request)
        .await
        .context("Chat completion request failed")?;

    debug!(
        id = response.id.as_deref().unwrap_or("-"),
        model = response.model.as_deref().unwrap_or("-"),
        finish_reason = response
            .choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
            .unwrap_or("-"),
        "Chat completion received"
    );
    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = ?usage.prompt_tokens,
            completion_tokens = ?usage.completion_tokens,
            total_tokens = ?usage.total_tokens,
            "Token usage"
        );
    }

    Ok(extract_content(&response)?.to_string())
}

/// Run the program against one article, writing the result to `out`
///
/// With `dry_run` the request body is written as pretty JSON and nothing is
/// sent.
pub async fn run<W: Write>(
    article_path: &Path,
    dry_run: bool,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let output = if dry_run {
        let request = prepare_request(article_path, config)?;
        serde_json::to_string_pretty(&request).context("Failed to serialize request")?
    } else {
        summarize_article(article_path, config).await?
    };

    writeln!(out, "{}", output).context("Failed to write output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::ClientError;
    use crate::models::article::ArticleError;
    use axum::{
        Router,
        extract::State,
        http::{HeaderMap, StatusCode, header},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    const COMPLETION_PATH: &str = "/openai/v1/chat/completions";

    #[derive(Debug, Clone)]
    struct CapturedRequest {
        authorization: Option<String>,
        content_type: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct MockState {
        status: StatusCode,
        body: String,
        captured: Arc<Mutex<Vec<CapturedRequest>>>,
    }

    async fn mock_completion(
        State(state): State<MockState>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let header_value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        state.captured.lock().unwrap().push(CapturedRequest {
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
            body: serde_json::from_str(&body).unwrap_or(Value::Null),
        });
        (state.status, state.body.clone())
    }

    /// Start a chat completion endpoint that answers every request the same way
    async fn spawn_mock(
        status: StatusCode,
        body: impl Into<String>,
    ) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body: body.into(),
            captured: captured.clone(),
        };
        let app = Router::new()
            .route(COMPLETION_PATH, post(mock_completion))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}{COMPLETION_PATH}"), captured)
    }

    fn completion_body(content: &str) -> String {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1738340100,
            "model": "mixtral-8x7b-32768",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        })
        .to_string()
    }

    fn config_for(url: &str) -> Config {
        Config::from_toml_str(
            &format!("[api]\nurl = \"{url}\"\n"),
            Some("test-key".to_string()),
        )
        .unwrap()
    }

    fn article_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const ARTICLE: &str = r#"{
        "title": "Australia bushfires: Canberra declares state of emergency",
        "source_domain": "www.bbc.com",
        "date_publish": "2020-01-31 01:35:00",
        "maintext": "Authorities in Canberra have declared a state of emergency."
    }"#;

    #[tokio::test]
    async fn test_prints_first_choice_verbatim() {
        let content = "Canberra emergency\n\nA state of emergency was declared.\n\n\
                       {\"events\": [{\"actor\": \"ACT government\", \"action\": \"declared\"}]}";
        let (url, captured) = spawn_mock(StatusCode::OK, completion_body(content)).await;
        let article = article_file(ARTICLE);

        let mut out = Vec::new();
        run(article.path(), false, &config_for(&url), &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), format!("{content}\n"));
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_request_on_the_wire() {
        let (url, captured) = spawn_mock(StatusCode::OK, completion_body("ok")).await;
        let article = article_file(r#"{"title": "Partial article"}"#);
        let config = config_for(&url);

        summarize_article(article.path(), &config).await.unwrap();

        let captured = captured.lock().unwrap();
        let request = &captured[0];
        assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
        assert_eq!(request.content_type.as_deref(), Some("application/json"));

        let body = &request.body;
        assert_eq!(body["model"], "mixtral-8x7b-32768");
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"],
            "Article Title: Partial article\nSource: UNKNOWN\nPublished: UNKNOWN\n\nMain Text:\nUNKNOWN"
        );
    }

    #[tokio::test]
    async fn test_error_status_produces_no_output() {
        let (url, captured) = spawn_mock(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": {"message": "upstream failure"}}"#,
        )
        .await;
        let article = article_file(ARTICLE);

        let mut out = Vec::new();
        let err = run(article.path(), false, &config_for(&url), &mut out)
            .await
            .unwrap_err();

        assert!(out.is_empty());
        assert_eq!(captured.lock().unwrap().len(), 1);
        match err.downcast_ref::<ClientError>() {
            Some(ClientError::Api { status, message }) => {
                assert_eq!(*status, 500);
                assert!(message.contains("upstream failure"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let (url, _captured) = spawn_mock(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Invalid API Key", "code": "invalid_api_key"}}"#,
        )
        .await;
        let article = article_file(ARTICLE);

        let err = summarize_article(article.path(), &config_for(&url))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_article_makes_no_request() {
        let (url, captured) = spawn_mock(StatusCode::OK, completion_body("unused")).await;
        let article = article_file("this is not json");

        let mut out = Vec::new();
        let err = run(article.path(), false, &config_for(&url), &mut out)
            .await
            .unwrap_err();

        assert!(out.is_empty());
        assert!(captured.lock().unwrap().is_empty());
        assert!(matches!(
            err.downcast_ref::<ArticleError>(),
            Some(ArticleError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_content_is_error() {
        let (url, _captured) = spawn_mock(StatusCode::OK, r#"{"choices": []}"#).await;
        let article = article_file(ARTICLE);

        let err = summarize_article(article.path(), &config_for(&url))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::MissingContent)
        ));
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_error() {
        let (url, _captured) = spawn_mock(StatusCode::OK, "<html>gateway</html>").await;
        let article = article_file(ARTICLE);

        let err = summarize_article(article.path(), &config_for(&url))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_request() {
        let (url, captured) = spawn_mock(StatusCode::OK, completion_body("unused")).await;
        let article = article_file(ARTICLE);
        let config = Config::from_toml_str(&format!("[api]\nurl = \"{url}\"\n"), None).unwrap();

        assert!(summarize_article(article.path(), &config).await.is_err());
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_prints_request_without_sending() {
        let (url, captured) = spawn_mock(StatusCode::OK, completion_body("unused")).await;
        let article = article_file(ARTICLE);
        let config = Config::from_toml_str(&format!("[api]\nurl = \"{url}\"\n"), None).unwrap();

        let mut out = Vec::new();
        run(article.path(), true, &config, &mut out).await.unwrap();

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["model"], "mixtral-8x7b-32768");
        assert_eq!(printed["messages"].as_array().unwrap().len(), 2);
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_usage_still_prints_content() {
        let (url, _captured) = spawn_mock(
            StatusCode::OK,
            r#"{"id": 123, "choices": [{"message": {"content": "hello"}}], "usage": {"total_tokens": 5}}"#,
        )
        .await;
        let article = article_file(ARTICLE);

        let mut out = Vec::new();
        run(article.path(), false, &config_for(&url), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
    }
}
