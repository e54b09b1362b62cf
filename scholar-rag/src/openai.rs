//! OpenAI embedding provider.
//!
//! Calls the `/v1/embeddings` endpoint directly over `reqwest`. Papers and
//! queries both go through here, so embeddings stay comparable.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const EMBEDDINGS_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// Known models and their output dimensionality.
const MODELS: &[(&str, usize)] =
    &[("text-embedding-3-small", 1536), ("text-embedding-3-large", 3072)];

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::Embedding { provider: "OpenAI".into(), message: message.into() }
}

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Defaults to `text-embedding-3-small`; pick another model with
/// [`with_model`](OpenAiEmbeddingProvider::with_model).
///
/// # Example
///
/// ```rust,ignore
/// use scholar_rag::OpenAiEmbeddingProvider;
///
/// let provider = OpenAiEmbeddingProvider::from_env()?;
/// let vector = provider.embed("adaptive retrieval").await?;
/// ```
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(embedding_error("API key must not be empty"));
        }
        let (model, dimensions) = MODELS[0];
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            dimensions,
        })
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) => Self::new(key),
            Err(_) => Err(embedding_error("OPENAI_API_KEY environment variable not set")),
        }
    }

    /// Switch to a different embedding model.
    ///
    /// Known models get their dimensionality filled in automatically;
    /// anything else needs `dimensions` spelled out.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: Option<usize>) -> Self {
        self.model = model.into();
        self.dimensions = dimensions
            .or_else(|| {
                MODELS.iter().find(|(name, _)| *name == self.model).map(|(_, dims)| *dims)
            })
            .unwrap_or(self.dimensions);
        self
    }
}

#[derive(Deserialize)]
struct ApiReply {
    data: Vec<ApiRow>,
}

#[derive(Deserialize)]
struct ApiRow {
    embedding: Vec<f32>,
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
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        if vectors.is_empty() {
            return Err(embedding_error("API returned no embedding"));
        }
        Ok(vectors.swap_remove(0))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(model = %self.model, batch_size = texts.len(), "requesting embeddings");

        let response = self
            .client
            .post(EMBEDDINGS_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": texts }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embedding request failed");
                embedding_error(format!("request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| embedding_error(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            error!(%status, "embeddings API error");
            return Err(embedding_error(format!(
                "API returned {status}: {}",
                error_detail(body)
            )));
        }

        let reply: ApiReply = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "unexpected embeddings response shape");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        Ok(reply.data.into_iter().map(|row| row.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
