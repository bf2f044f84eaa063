mod common;

use anyhow::Result;
use arxcon_agent::engines::ResponseSynthesizer;
use arxcon_agent::memory::message_tokens;
use arxcon_agent::{PaperAgent, PaperAgentBuilder, QueryEngine, QueryEngineTool, Tool, ToolMetadata};
use arxcon_core::chunking::SentenceSplitter;
use arxcon_core::{Document, PaperMetadata};
use async_trait::async_trait;
use common::{call_tool, reply, KeywordEmbedder, MockLlm};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn robot_document() -> Document {
    Document {
        file_name: "2401_00001v1.pdf".to_string(),
        text: "We teach a robot to grasp objects. The robot uses tactile sensing.".to_string(),
        metadata: PaperMetadata {
            title: "Tactile Robot Grasping".to_string(),
            authors: "Ada Lovelace".to_string(),
            published: "01/02/2024".to_string(),
            url: "http://arxiv.org/abs/2401.00001v1".to_string(),
            summary: String::new(),
        },
    }
}

fn builder(llm: Arc<MockLlm>, storage: &Path) -> PaperAgentBuilder {
    let synthesizer = Arc::new(ResponseSynthesizer::new(llm.clone(), 3000));
    PaperAgentBuilder::new(llm, Arc::new(KeywordEmbedder), synthesizer, storage.to_path_buf())
}

#[tokio::test]
async fn builds_and_persists_index_and_summary() {
    let dir = tempdir().unwrap();
    let llm = Arc::new(MockLlm::standard());
    let nodes = SentenceSplitter::new(1024, 200)
        .nodes_from_document(&robot_document())
        .unwrap();

    let built = builder(llm.clone(), dir.path())
        .build_agent_per_doc(nodes, "2401_00001v1")
        .await
        .unwrap();

    assert_eq!(built.summary, "This paper studies robot.");
    assert!(!built.nodes.is_empty());
    assert!(built.nodes.iter().all(|n| n.embedding.is_some()));
    assert!(dir
        .path()
        .join("vector/2401_00001v1/index.json")
        .is_file());
    assert!(dir
        .path()
        .join("summary/2401_00001v1_summary.json")
        .is_file());
    assert_eq!(
        built.agent.tool_names(),
        vec!["vector_tool_2401_00001v1", "summary_tool_2401_00001v1"]
    );
}

#[tokio::test]
async fn second_build_reuses_stored_state() {
    let dir = tempdir().unwrap();
    let nodes = SentenceSplitter::new(1024, 200)
        .nodes_from_document(&robot_document())
        .unwrap();

    let first_llm = Arc::new(MockLlm::standard());
    let first = builder(first_llm, dir.path())
        .build_agent_per_doc(nodes, "2401_00001v1")
        .await
        .unwrap();

    let second_llm = Arc::new(MockLlm::standard());
    let b = builder(second_llm.clone(), dir.path());
    assert!(b.has_index("2401_00001v1"));
    let second = b
        .build_agent_per_doc(Vec::new(), "2401_00001v1")
        .await
        .unwrap();

    assert_eq!(second.summary, first.summary);
    assert_eq!(second.nodes.len(), first.nodes.len());
    // Nothing to summarize again.
    assert_eq!(second_llm.call_count(), 0);
}

#[tokio::test]
async fn nothing_to_index_is_an_error() {
    let dir = tempdir().unwrap();
    let llm = Arc::new(MockLlm::standard());
    let result = builder(llm, dir.path())
        .build_agent_per_doc(Vec::new(), "2401_00009v1")
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn agent_answers_through_vector_tool() {
    let dir = tempdir().unwrap();
    let llm = Arc::new(MockLlm::standard());
    let nodes = SentenceSplitter::new(1024, 200)
        .nodes_from_document(&robot_document())
        .unwrap();
    let built = builder(llm.clone(), dir.path())
        .build_agent_per_doc(nodes, "2401_00001v1")
        .await
        .unwrap();

    let answer = built.agent.query("How does the robot grasp?").await.unwrap();
    assert_eq!(answer, "Paper answer: Answer: robot");

    // The tool result went back to the model as a tool message.
    let calls = llm.calls();
    let last = calls.last().unwrap();
    assert_eq!(last.last().unwrap().role, "tool");
    assert!(last[0].content.contains("`2401_00001v1`"));
}

#[tokio::test]
async fn agent_memory_carries_over_until_reset() {
    let dir = tempdir().unwrap();
    let llm = Arc::new(MockLlm::standard());
    let nodes = SentenceSplitter::new(1024, 200)
        .nodes_from_document(&robot_document())
        .unwrap();
    let built = builder(llm.clone(), dir.path())
        .build_agent_per_doc(nodes, "2401_00001v1")
        .await
        .unwrap();

    built.agent.chat("first question about the robot").await.unwrap();
    built.agent.chat("second question").await.unwrap();
    let calls = llm.calls();
    assert!(calls
        .last()
        .unwrap()
        .iter()
        .any(|m| m.content == "first question about the robot"));

    built.agent.reset().await;
    built.agent.chat("third question").await.unwrap();
    let calls = llm.calls();
    assert!(!calls
        .last()
        .unwrap()
        .iter()
        .any(|m| m.content == "first question about the robot"));
}

#[tokio::test]
async fn agent_gives_up_after_max_steps() {
    let dir = tempdir().unwrap();
    let standard = MockLlm::standard();
    let nodes = SentenceSplitter::new(1024, 200)
        .nodes_from_document(&robot_document())
        .unwrap();
    // Build with the standard model so the summary exists.
    builder(Arc::new(standard), dir.path())
        .build_agent_per_doc(nodes, "2401_00001v1")
        .await
        .unwrap();

    // This model never stops calling tools.
    let stubborn = Arc::new(MockLlm::new(|messages, tools| {
        if tools.is_empty() {
            return common::reply(format!("Answer: {}", messages.len()));
        }
        call_tool("vector_tool_2401_00001v1", "again")
    }));
    let built = builder(stubborn, dir.path())
        .with_max_steps(2)
        .build_agent_per_doc(Vec::new(), "2401_00001v1")
        .await
        .unwrap();

    let err = built.agent.chat("loop forever").await.unwrap_err();
    assert!(err.to_string().contains("within 2 steps"));
}

/// Returns the same long passage for every query
struct VerboseEngine;

#[async_trait]
impl QueryEngine for VerboseEngine {
    async fn query(&self, _query: &str) -> Result<String> {
        Ok("fact ".repeat(500))
    }
}

#[tokio::test]
async fn long_conversations_keep_prompt_bounded() {
    let llm = Arc::new(MockLlm::new(|messages, _tools| {
        match messages.last().map(|m| m.role.as_str()) {
            Some("tool") => reply("Noted."),
            _ => call_tool("facts", "tell me more"),
        }
    }));
    let tool: Arc<dyn Tool> = Arc::new(QueryEngineTool::new(
        Arc::new(VerboseEngine),
        ToolMetadata::new("facts", "Long passages"),
    ));
    let limit = 2000;
    let agent = PaperAgent::new("2401_00001v1", llm.clone(), vec![tool], 4)
        .with_memory_token_limit(limit);

    for i in 0..200 {
        let answer = agent.chat(&format!("question {}", i)).await.unwrap();
        assert_eq!(answer, "Noted.");
    }

    let calls = llm.calls();
    let first_turn: usize = calls[1].iter().map(message_tokens).sum();
    let last: &Vec<_> = calls.last().unwrap();
    let last_size: usize = last.iter().map(message_tokens).sum();
    assert!(
        last_size <= limit + first_turn,
        "prompt grew to {} tokens",
        last_size
    );

    // Recent turns are still replayed, the earliest are gone.
    assert!(last.iter().any(|m| m.content == "question 198"));
    assert!(!last.iter().any(|m| m.content == "question 0"));
}
