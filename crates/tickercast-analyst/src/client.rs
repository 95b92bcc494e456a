use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::AnalystError;

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Safe-for-concurrent-use singleton; constructed once per analyze stage and
/// shared by reference across the batch. Use [`LlmClient::with_base_url`] to
/// point at a mock server in tests.
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<ResponseContent>,
}

/// The wire `content` field comes back as either a plain string or a list
/// of text parts depending on provider and model. This closed variant type
/// is normalized to one string at the client boundary so the extractor only
/// ever sees `&str`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Typed {
        #[serde(default)]
        text: Option<String>,
    },
    Plain(String),
}

impl ResponseContent {
    /// List elements are joined with a single space; the result is trimmed.
    fn into_text(self) -> String {
        match self {
            ResponseContent::Text(s) => s.trim().to_owned(),
            ResponseContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|p| match p {
                    ContentPart::Typed { text } => text,
                    ContentPart::Plain(s) => Some(s),
                })
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_owned(),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl LlmClient {
    /// Creates a client pointed at the default generation endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AnalystError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock,
    /// or for pointing at a different OpenAI-compatible provider).
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::Http`] if the client cannot be constructed,
    /// or [`AnalystError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AnalystError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| AnalystError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Runs one system+user exchange at temperature 0 and returns the raw
    /// assistant text, normalized from whichever content shape the provider
    /// used. Missing content normalizes to an empty string — the extractor's
    /// empty-input fallback owns that case.
    ///
    /// # Errors
    ///
    /// - [`AnalystError::Api`] — the provider returned an error body.
    /// - [`AnalystError::UnexpectedStatus`] — non-2xx without one.
    /// - [`AnalystError::NoChoices`] — 2xx with an empty choice list.
    /// - [`AnalystError::Http`] / [`AnalystError::Deserialize`] — transport
    ///   or body-shape failures.
    pub async fn generate(&self, system: &str, user: &str) -> Result<String, AnalystError> {
        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|e| AnalystError::Api(format!("invalid completions URL: {e}")))?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
                if let Some(message) = envelope.error.message {
                    return Err(AnalystError::Api(message));
                }
            }
            return Err(AnalystError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| AnalystError::Deserialize {
                context: "chat/completions".to_owned(),
                source: e,
            })?;

        let choice = parsed.choices.into_iter().next().ok_or(AnalystError::NoChoices)?;
        Ok(choice
            .message
            .content
            .map(ResponseContent::into_text)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_content_normalizes_trimmed() {
        let content: ResponseContent = serde_json::from_str(r#""  hello  ""#).unwrap();
        assert_eq!(content.into_text(), "hello");
    }

    #[test]
    fn part_list_joins_with_single_spaces() {
        let content: ResponseContent = serde_json::from_str(
            r#"[{"type": "text", "text": "alpha"}, "beta", {"type": "text", "text": "gamma"}]"#,
        )
        .unwrap();
        assert_eq!(content.into_text(), "alpha beta gamma");
    }

    #[test]
    fn parts_without_text_are_skipped() {
        let content: ResponseContent =
            serde_json::from_str(r#"[{"type": "thinking"}, {"type": "text", "text": "kept"}]"#)
                .unwrap();
        assert_eq!(content.into_text(), "kept");
    }
}
