//! Second-stage ordering of retrieved candidates

use crate::prompts;
use anyhow::Result;
use arxcon_core::ModelProvider;
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reorders candidates for a query.
///
/// Candidates arrive in similarity order. Implementations return indices into
/// `candidates`, best first, at most `top_n` of them.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(&self, query: &str, candidates: &[String], top_n: usize)
        -> Result<Vec<usize>>;
}

/// Keeps similarity order
pub struct NoopReranker;

#[async_trait]
impl Reranker for NoopReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: &[String],
        top_n: usize,
    ) -> Result<Vec<usize>> {
        Ok((0..candidates.len().min(top_n)).collect())
    }
}

/// Scores each candidate with one LLM call
pub struct LlmReranker {
    llm: Arc<dyn ModelProvider>,
}

impl LlmReranker {
    pub fn new(llm: Arc<dyn ModelProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[String],
        top_n: usize,
    ) -> Result<Vec<usize>> {
        let fallback: Vec<usize> = (0..candidates.len().min(top_n)).collect();
        if candidates.len() <= 1 {
            return Ok(fallback);
        }

        let prompts: Vec<String> = candidates
            .iter()
            .map(|c| prompts::rerank_score(query, c))
            .collect();
        let replies = join_all(prompts.iter().map(|p| self.llm.complete(p))).await;

        let mut scored = Vec::with_capacity(candidates.len());
        for (i, reply) in replies.into_iter().enumerate() {
            let score = match reply {
                Ok(text) => parse_score(&text),
                Err(e) => {
                    warn!("rerank call failed, keeping similarity order: {}", e);
                    return Ok(fallback);
                }
            };
            let Some(score) = score else {
                warn!("unparseable rerank score, keeping similarity order");
                return Ok(fallback);
            };
            scored.push((i, score));
        }

        // Stable, so ties keep similarity order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        debug!("rerank scores: {:?}", scored);
        Ok(scored.into_iter().take(top_n).map(|(i, _)| i).collect())
    }
}

/// `score` from the first JSON object in `reply`, or a bare number
pub fn parse_score(reply: &str) -> Option<f32> {
    let trimmed = reply.trim();
    if let Ok(n) = trimmed.parse::<f32>() {
        return Some(n);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    let value: Value = serde_json::from_str(&trimmed[start..=end]).ok()?;
    match &value["score"] {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arxcon_core::Message;

    /// Scores a candidate by the digit in its description
    struct DigitScorer;

    #[async_trait]
    impl ModelProvider for DigitScorer {
        async fn chat(&self, messages: &[Message]) -> Result<String> {
            let prompt = &messages[0].content;
            let desc = prompt
                .split("Document description:\n")
                .nth(1)
                .unwrap_or_default();
            let digit = desc.chars().find(|c| c.is_ascii_digit()).unwrap_or('0');
            Ok(format!("{{\"score\": {}}}", digit))
        }

        fn model_name(&self) -> &str {
            "digit"
        }
    }

    struct Rambler;

    #[async_trait]
    impl ModelProvider for Rambler {
        async fn chat(&self, _messages: &[Message]) -> Result<String> {
            Ok("It is quite relevant I think".to_string())
        }

        fn model_name(&self) -> &str {
            "rambler"
        }
    }

    fn candidates() -> Vec<String> {
        vec!["paper 2".into(), "paper 9".into(), "paper 5".into()]
    }

    #[tokio::test]
    async fn orders_by_llm_score() {
        let reranker = LlmReranker::new(Arc::new(DigitScorer));
        let order = reranker.rerank("q", &candidates(), 2).await.unwrap();
        assert_eq!(order, vec![1, 2]);
    }

    #[tokio::test]
    async fn unparseable_reply_keeps_similarity_order() {
        let reranker = LlmReranker::new(Arc::new(Rambler));
        let order = reranker.rerank("q", &candidates(), 2).await.unwrap();
        assert_eq!(order, vec![0, 1]);
    }

    #[tokio::test]
    async fn noop_truncates() {
        let order = NoopReranker.rerank("q", &candidates(), 5).await.unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn score_formats() {
        assert_eq!(parse_score("{\"score\": 7}"), Some(7.0));
        assert_eq!(parse_score("Sure: {\"score\": \"3.5\"}"), Some(3.5));
        assert_eq!(parse_score(" 4 "), Some(4.0));
        assert_eq!(parse_score("{\"relevance\": 1}"), None);
    }
}
