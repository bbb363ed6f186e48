//! OpenAI-compatible chat completion client.

use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::prompt::truncate_chars;
use super::service::{ChatMessage, CompletionRequest, CompletionService, ServiceError};
use crate::error::{Error, Result};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Connection settings for [`OpenAiClient`].
#[derive(Clone)]
pub struct ServiceConfig {
    /// Bearer credential
    pub api_key: String,
    /// API root, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model used when a request does not name one
    pub model: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ServiceConfig,
    http: HttpClient,
}

impl OpenAiClient {
    /// Create a client. Fails with [`Error::MissingCredential`] when the
    /// key is empty.
    pub fn new(mut config: ServiceConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingCredential(
                "no API key for the completion service (set OPENAI_API_KEY)".to_string(),
            ));
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ServiceConfig(e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl CompletionService for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ServiceError> {
        let body = ChatBody {
            model: request.model.as_deref().unwrap_or(&self.config.model),
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: error_message(&text),
            });
        }
        parse_completion(&text)
    }
}

/// Pull the first choice's content out of a response body.
fn parse_completion(body: &str) -> std::result::Result<String, ServiceError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ServiceError::MalformedResponse("no message content".to_string()))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => truncate_chars(body, 300).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_missing_credential() {
        let result = OpenAiClient::new(ServiceConfig::new("  "));
        assert!(matches!(result, Err(Error::MissingCredential(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            OpenAiClient::new(ServiceConfig::new("sk-test").with_base_url("http://localhost/v1/"))
                .unwrap();
        assert_eq!(client.config().base_url, "http://localhost/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", ServiceConfig::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_body_serialization() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = ChatBody {
            model: "gpt-4",
            messages: &messages,
            max_tokens: 1000,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Decision: APPROVED"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Decision: APPROVED");

        let empty = r#"{"choices":[]}"#;
        assert!(matches!(
            parse_completion(empty),
            Err(ServiceError::MalformedResponse(_))
        ));
        assert!(parse_completion("<html>").is_err());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
