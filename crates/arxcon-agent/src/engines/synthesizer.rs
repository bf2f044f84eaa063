//! Turning retrieved texts into an answer within a prompt budget

use crate::prompts;
use anyhow::Result;
use arxcon_core::chunking::{count_tokens, SentenceSplitter};
use arxcon_core::ModelProvider;
use futures::future::join_all;
use std::sync::Arc;

pub const EMPTY_RESPONSE: &str = "Empty Response: no context was available to answer the query.";

/// Summaries are repacked at most this many times before answering from what is left.
const MAX_TREE_ROUNDS: usize = 8;

pub struct ResponseSynthesizer {
    llm: Arc<dyn ModelProvider>,
    budget: usize,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn ModelProvider>, context_budget_tokens: usize) -> Self {
        Self {
            llm,
            budget: context_budget_tokens.max(1),
        }
    }

    /// Greedily join texts into blocks of at most `budget` tokens.
    /// A text larger than the budget is split on its own first.
    pub fn pack(&self, texts: &[String]) -> Result<Vec<String>> {
        let splitter = SentenceSplitter::new(self.budget, 0);
        let mut packs = Vec::new();
        let mut current = String::new();
        let mut current_tokens = 0usize;

        for text in texts {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let pieces = if count_tokens(text) > self.budget {
                splitter.split_text(text)?
            } else {
                vec![text.to_string()]
            };

            for piece in pieces {
                let tokens = count_tokens(&piece);
                if !current.is_empty() && current_tokens + tokens > self.budget {
                    packs.push(std::mem::take(&mut current));
                    current_tokens = 0;
                }
                if !current.is_empty() {
                    current.push_str("\n\n");
                }
                current.push_str(&piece);
                current_tokens += tokens;
            }
        }
        if !current.is_empty() {
            packs.push(current);
        }
        Ok(packs)
    }

    /// Answer from the first pack, then refine the answer with each later one
    pub async fn compact(&self, query: &str, texts: &[String]) -> Result<String> {
        let packs = self.pack(texts)?;
        let mut packs = packs.into_iter();
        let Some(first) = packs.next() else {
            return Ok(EMPTY_RESPONSE.to_string());
        };

        let mut answer = self.llm.complete(&prompts::text_qa(&first, query)).await?;
        for pack in packs {
            answer = self
                .llm
                .complete(&prompts::refine(query, &answer, &pack))
                .await?;
        }
        Ok(answer.trim().to_string())
    }

    /// Summarize packs concurrently, repacking the summaries until one pack remains
    pub async fn tree_summarize(&self, query: &str, texts: &[String]) -> Result<String> {
        let mut packs = self.pack(texts)?;
        if packs.is_empty() {
            return Ok(EMPTY_RESPONSE.to_string());
        }

        for round in 0..MAX_TREE_ROUNDS {
            if packs.len() == 1 {
                break;
            }
            tracing::debug!("tree_summarize round {} over {} packs", round, packs.len());
            let requests: Vec<String> = packs
                .iter()
                .map(|pack| prompts::tree_summarize(pack, query))
                .collect();
            let summaries = join_all(requests.iter().map(|r| self.llm.complete(r)))
                .await
                .into_iter()
                .collect::<Result<Vec<String>>>()?;
            packs = self.pack(&summaries)?;
            if packs.is_empty() {
                return Ok(EMPTY_RESPONSE.to_string());
            }
        }

        let answer = self
            .llm
            .complete(&prompts::tree_summarize(&packs[0], query))
            .await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arxcon_core::Message;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with how many times it was called
    struct Recorder {
        prompts: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for Recorder {
        async fn chat(&self, messages: &[Message]) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(messages[0].content.clone());
            Ok(format!("answer {}", prompts.len()))
        }

        fn model_name(&self) -> &str {
            "recorder"
        }
    }

    fn texts(n: usize, words: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("passage {} {}", i, "word ".repeat(words)))
            .collect()
    }

    #[test]
    fn pack_respects_budget_and_order() {
        let synth = ResponseSynthesizer::new(Recorder::new(), 60);
        let packs = synth.pack(&texts(6, 20)).unwrap();
        assert!(packs.len() > 1);
        for pack in &packs {
            assert!(count_tokens(pack) <= 60 + 2, "pack too large");
        }
        assert!(packs[0].starts_with("passage 0"));
    }

    #[tokio::test]
    async fn compact_refines_with_later_packs() {
        let llm = Recorder::new();
        let synth = ResponseSynthesizer::new(llm.clone(), 60);
        let answer = synth.compact("what?", &texts(6, 20)).await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts.len() > 1);
        assert!(prompts[0].starts_with("Context information is below."));
        assert!(prompts[1].starts_with("The original query is as follows: what?"));
        assert!(prompts[1].contains("existing answer: answer 1"));
        assert_eq!(answer, format!("answer {}", prompts.len()));
    }

    #[tokio::test]
    async fn tree_summarize_single_pack_is_one_call() {
        let llm = Recorder::new();
        let synth = ResponseSynthesizer::new(llm.clone(), 3000);
        let answer = synth.tree_summarize("sum", &texts(3, 5)).await.unwrap();
        assert_eq!(answer, "answer 1");
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tree_summarize_reduces_many_packs() {
        let llm = Recorder::new();
        let synth = ResponseSynthesizer::new(llm.clone(), 60);
        synth.tree_summarize("sum", &texts(8, 20)).await.unwrap();
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts.len() >= 3);
        assert!(prompts
            .iter()
            .all(|p| p.starts_with("Context information from multiple sources is below.")));
    }

    #[tokio::test]
    async fn empty_inputs_need_no_llm() {
        let llm = Recorder::new();
        let synth = ResponseSynthesizer::new(llm.clone(), 100);
        assert_eq!(synth.compact("q", &[]).await.unwrap(), EMPTY_RESPONSE);
        assert_eq!(
            synth.tree_summarize("q", &["   ".to_string()]).await.unwrap(),
            EMPTY_RESPONSE
        );
        assert!(llm.prompts.lock().unwrap().is_empty());
    }
}
