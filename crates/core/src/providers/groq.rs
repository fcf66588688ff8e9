use crate::error::ProviderError;
use crate::providers::{ChatMessage, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Chat-completion client for Groq's OpenAI-compatible API.
pub struct GroqClient {
    client: Client,
    chat_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_GROQ_BASE_URL, api_key, model)
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("groq".to_string()));
        }

        Url::parse(base_url)?;
        let base = base_url.trim_end_matches('/');

        Ok(Self {
            client: Client::new(),
            chat_url: format!("{base}/chat/completions"),
            api_key,
            model: model.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::EmptyResponse("groq".to_string()))
}

#[async_trait]
impl LlmProvider for GroqClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Backend {
                provider: "groq".to_string(),
                details: format!("{status}: {}", body.trim()),
            });
        }

        let payload: ChatCompletionResponse = response.json().await?;
        first_choice_content(payload)
    }
}
