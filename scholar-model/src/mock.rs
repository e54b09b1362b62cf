//! Mock LLM for tests and offline runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::Llm;

/// A fake [`Llm`] that returns a fixed reply and records every prompt.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_model::{Llm, MockLlm};
///
/// let model = MockLlm::new("mock-small", "canned reply");
/// assert_eq!(model.query("anything", 0.0).await?, "canned reply");
/// assert_eq!(model.calls().len(), 1);
/// ```
pub struct MockLlm {
    name: String,
    reply: String,
    calls: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Create a mock that answers every query with `reply`.
    pub fn new(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self { name: name.into(), reply: reply.into(), calls: Mutex::new(Vec::new()) }
    }

    /// Prompts received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Number of queries handled so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock call log poisoned").len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, prompt: &str, _temperature: f32) -> Result<String> {
        self.calls.lock().expect("mock call log poisoned").push(prompt.to_string());
        Ok(self.reply.clone())
    }
}
