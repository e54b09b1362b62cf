//! The [`Llm`] trait: a synchronous request/response model interface.

use async_trait::async_trait;

use crate::error::Result;

/// A chat-completion language model.
///
/// Implementations wrap a specific backend behind a blocking-style async
/// interface: one prompt in, one completion out, no streaming and no tool
/// calling.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_model::Llm;
///
/// let reply = model.query("Summarize this passage…", 0.0).await?;
/// ```
#[async_trait]
pub trait Llm: Send + Sync {
    /// The model identifier, used in logs and routing decisions.
    fn name(&self) -> &str;

    /// Send a single-turn prompt and return the completion text.
    ///
    /// `temperature` is forwarded to the backend unchanged. Errors from the
    /// backend propagate; no retry is performed here.
    async fn query(&self, prompt: &str, temperature: f32) -> Result<String>;
}
