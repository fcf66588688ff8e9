pub mod groq;
pub mod ollama;

pub use groq::GroqClient;
pub use ollama::OllamaEmbedder;

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Maps text to fixed-dimension vectors. Must return one vector per input,
/// in input order, and be deterministic for a fixed model version.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    fn dimensions(&self) -> usize;
}

/// Turns an ordered message list into a completion.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRole};

    #[test]
    fn roles_serialize_lowercase() {
        let message = ChatMessage::system("be helpful");
        let value = serde_json::to_value(&message).expect("message serializes");
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "be helpful");

        let user = serde_json::to_value(ChatMessage::user("hi")).expect("message serializes");
        assert_eq!(user["role"], "user");
    }

    #[test]
    fn roles_round_trip() {
        let parsed: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"sure"}"#)
                .expect("message parses");
        assert_eq!(parsed.role, ChatRole::Assistant);
    }
}
