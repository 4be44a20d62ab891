use crate::message::{Message, MessageContent};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// Default OpenAI API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Failures of a single completion call
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Network or transport failure
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The response body did not have the expected shape
    #[error("malformed completion response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Remote service turning an ordered list of messages into replies.
///
/// Returns one content value per choice, in the order the service sent them.
pub trait CompletionEndpoint: Send + Sync + 'static {
    fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> impl Future<Output = Result<Vec<MessageContent>, CompletionError>> + Send;
}

/// API credentials for the completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub organization: Option<String>,
    pub project: Option<String>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<MessageContent>,
}

/// Chat-completions client for OpenAI-compatible services
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionEndpoint for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Vec<MessageContent>, CompletionError> {
        let url = self.endpoint_url();
        debug!(%url, model, messages = messages.len(), "requesting completion");

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.credentials.api_key)
            .json(&CompletionRequest { model, messages });

        if let Some(organization) = &self.credentials.organization {
            request = request.header("OpenAI-Organization", organization);
        }
        if let Some(project) = &self.credentials.project {
            request = request.header("OpenAI-Project", project);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&body)?;
        debug!(model, choices = parsed.choices.len(), "completion received");

        Ok(parsed
            .choices
            .into_iter()
            .map(|choice| {
                choice
                    .message
                    .content
                    .unwrap_or_else(|| MessageContent::Text(String::new()))
            })
            .collect())
    }
}
