//! Size-routed summarization.
//!
//! [`SummaryRouter`] holds two [`Llm`] tiers and picks one per passage by
//! composed prompt length: short prompts go to the small (cheap) model,
//! long ones to the large-context model. The summary and relevance score
//! are written back into each result's chunk metadata.

use std::sync::Arc;

use scholar_model::Llm;
use tracing::info;

use crate::document::SearchResult;
use crate::error::{RagError, Result};

/// Prompts at or above this many characters go to the large model.
const LARGE_PROMPT_THRESHOLD: usize = 10_000;

/// Metadata key for the attached one-sentence summary.
pub const SUMMARY_KEY: &str = "summary";

/// Metadata key for the attached relevance score.
pub const SCORE_KEY: &str = "score";

/// Routes summarization between a small and a large language model.
pub struct SummaryRouter {
    small: Arc<dyn Llm>,
    large: Arc<dyn Llm>,
    temperature: f32,
}

impl SummaryRouter {
    /// Create a router over the two capacity tiers.
    pub fn new(small: Arc<dyn Llm>, large: Arc<dyn Llm>) -> Self {
        Self { small, large, temperature: 0.0 }
    }

    /// Override the sampling temperature passed to both tiers (default 0.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The instruction prompt for one passage.
    fn compose_prompt(query: &str, passage: &str) -> String {
        format!(
            "Summarize the following paper contents with exactly ONE concise sentence for how \
             it relates to {query}, output it in the format of 'XXXXXXX (A Question/Method/\
             Model/Concept/Results/Conclusion etc.) was proposed/raised/mentioned/analyzed/\
             found that XXXXX': {passage}\nPlease do not mention 'this paper' or 'figure' or \
             'table' in the summary."
        )
    }

    /// Summarize one passage, routing by composed prompt length.
    ///
    /// # Errors
    ///
    /// Propagates model backend errors unchanged; no retry.
    pub async fn summarize(&self, query: &str, passage: &str) -> Result<String> {
        let prompt = Self::compose_prompt(query, passage);
        let agent = if prompt.chars().count() < LARGE_PROMPT_THRESHOLD {
            info!(prompt_len = prompt.chars().count(), model = self.small.name(), "routing to small model");
            &self.small
        } else {
            info!(prompt_len = prompt.chars().count(), model = self.large.name(), "routing to large model");
            &self.large
        };
        Ok(agent.query(&prompt, self.temperature).await?)
    }

    /// Summarize every aggregated passage, attaching `summary` and `score`
    /// to each result's metadata in place.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NoSources`] when `results` is empty. Model
    /// errors abort the batch; no partial summaries are returned.
    pub async fn summarize_all(
        &self,
        query: &str,
        mut results: Vec<SearchResult>,
    ) -> Result<Vec<SearchResult>> {
        if results.is_empty() {
            return Err(RagError::NoSources);
        }

        for result in &mut results {
            let summary = self.summarize(query, &result.chunk.text).await?;
            info!(chunk = %result.chunk.id, %summary, "summarized passage");
            result.chunk.metadata.insert(SUMMARY_KEY.to_string(), summary);
            result.chunk.metadata.insert(SCORE_KEY.to_string(), result.score.to_string());
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use scholar_model::MockLlm;

    use super::*;

    fn router() -> (Arc<MockLlm>, Arc<MockLlm>, SummaryRouter) {
        let small = Arc::new(MockLlm::new("small", "small summary"));
        let large = Arc::new(MockLlm::new("large", "large summary"));
        let router =
            SummaryRouter::new(small.clone() as Arc<dyn Llm>, large.clone() as Arc<dyn Llm>);
        (small, large, router)
    }

    /// Pad the passage so the composed prompt has exactly `target` chars.
    fn passage_for_prompt_len(query: &str, target: usize) -> String {
        let overhead = SummaryRouter::compose_prompt(query, "").chars().count();
        "x".repeat(target - overhead)
    }

    #[tokio::test]
    async fn prompt_just_below_threshold_routes_small() {
        let (small, large, router) = router();
        let passage = passage_for_prompt_len("q", LARGE_PROMPT_THRESHOLD - 1);
        let summary = router.summarize("q", &passage).await.unwrap();
        assert_eq!(summary, "small summary");
        assert_eq!(small.call_count(), 1);
        assert_eq!(large.call_count(), 0);
    }

    #[tokio::test]
    async fn prompt_at_threshold_routes_large() {
        let (small, large, router) = router();
        let passage = passage_for_prompt_len("q", LARGE_PROMPT_THRESHOLD);
        let summary = router.summarize("q", &passage).await.unwrap();
        assert_eq!(summary, "large summary");
        assert_eq!(small.call_count(), 0);
        assert_eq!(large.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_aggregate_is_an_error() {
        let (_, _, router) = router();
        let err = router.summarize_all("q", Vec::new()).await.unwrap_err();
        assert!(matches!(err, RagError::NoSources));
    }

    #[tokio::test]
    async fn prompt_forbids_meta_references() {
        let prompt = SummaryRouter::compose_prompt("medical QA", "body");
        assert!(prompt.contains("exactly ONE concise sentence"));
        assert!(prompt.contains("do not mention 'this paper'"));
        assert!(prompt.contains("medical QA"));
    }
}
