//! OpenAI chat-completions client.
//!
//! Speaks to `/v1/chat/completions` on api.openai.com or any compatible
//! server (Ollama, vLLM, LM Studio) via
//! [`OpenAiChatModel::compatible`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::Llm;

const CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// An [`Llm`] backed by an OpenAI-compatible chat completions API.
///
/// Scholar typically holds two of these: a small tier (`gpt-4o-mini`) and
/// a large-context tier (`gpt-4o`).
///
/// # Example
///
/// ```rust,ignore
/// use scholar_model::OpenAiChatModel;
///
/// let small = OpenAiChatModel::from_env("gpt-4o-mini")?;
/// let large = OpenAiChatModel::from_env("gpt-4o")?;
/// ```
#[derive(Debug)]
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiChatModel {
    /// Create a client with the given API key and model name.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::MissingApiKey("OpenAI".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            url: CHAT_ENDPOINT.into(),
        })
    }

    /// Create a client using the `OPENAI_API_KEY` environment variable.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) => Self::new(key, model),
            Err(_) => Err(ModelError::MissingApiKey("OpenAI".into())),
        }
    }

    /// Create a client for an OpenAI-compatible API at a custom base URL.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let mut this = Self::new(api_key, model)?;
        this.url = format!("{}/chat/completions", base_url.into().trim_end_matches('/'));
        Ok(this)
    }
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatTurn,
}

#[derive(Deserialize)]
struct ChatTurn {
    content: String,
}

/// Pull the human-readable message out of an OpenAI error body, falling
/// back to the raw body.
fn error_detail(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or(body)
}

#[async_trait]
impl Llm for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn query(&self, prompt: &str, temperature: f32) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), temperature, "chat request");

        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": temperature,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "chat request failed");
                ModelError::Http(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ModelError::Http(e.to_string()))?;

        if !status.is_success() {
            error!(model = %self.model, %status, "chat API error");
            return Err(ModelError::Api {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {}", error_detail(body)),
            });
        }

        let reply: ChatReply = serde_json::from_str(&body).map_err(|e| {
            error!(model = %self.model, error = %e, "unexpected chat response shape");
            ModelError::Parse(e.to_string())
        })?;

        match reply.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => Err(ModelError::Parse("response contained no choices".into())),
        }
    }
}
