//! The one concrete [`LlmClient`] this crate ships: an OpenAI-compatible
//! chat completion call via `genai`. `govscan-llm` only specifies the
//! contract; wiring a provider is an application concern, not a core one.

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatRequest};
use genai::Client;
use govscan_llm::{LlmClient, LlmError};

pub struct GenaiClient {
    client: Client,
    model: String,
    label: String,
}

impl GenaiClient {
    pub fn new(model: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            label: label.into(),
        }
    }
}

#[async_trait]
impl LlmClient for GenaiClient {
    async fn generate(
        &self,
        user_prompt: &str,
        system_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        use genai::chat::ChatOptions;

        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ]);
        let options = ChatOptions::default()
            .with_temperature(temperature as f64)
            .with_max_tokens(max_tokens);

        let res = tokio::time::timeout(
            govscan_llm::DEFAULT_TIMEOUT,
            self.client.exec_chat(&self.model, chat_req, Some(&options)),
        )
        .await
        .map_err(|_| LlmError::Timeout(govscan_llm::DEFAULT_TIMEOUT))?
        .map_err(|e| LlmError::GenerationFailed(e.to_string()))?;

        res.content_text_as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::GenerationFailed("empty response content".to_string()))
    }

    fn label(&self) -> &str {
        &self.label
    }
}
