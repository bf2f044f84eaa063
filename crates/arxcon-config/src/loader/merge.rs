//! Configuration merging logic
//!
//! A field from `overlay` wins only where it differs from the default, so a
//! partially specified source never resets values set by an earlier one.

use crate::{types::*, Config};

pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.arxiv = merge_arxiv(base.arxiv, overlay.arxiv);
    base.llm = merge_llm(base.llm, overlay.llm);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.retrieval = merge_retrieval(base.retrieval, overlay.retrieval);
    base.summary = merge_summary(base.summary, overlay.summary);
    base.agent = merge_agent(base.agent, overlay.agent);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn pick_f32(base: f32, overlay: f32, default: f32) -> f32 {
    if (overlay - default).abs() > 0.001 {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        storage_dir: pick(base.storage_dir, overlay.storage_dir, default.storage_dir),
        papers_dir: pick(base.papers_dir, overlay.papers_dir, default.papers_dir),
        persist_papers: pick(
            base.persist_papers,
            overlay.persist_papers,
            default.persist_papers,
        ),
        max_results: pick(base.max_results, overlay.max_results, default.max_results),
        api_key_file: pick(base.api_key_file, overlay.api_key_file, default.api_key_file),
    }
}

fn merge_arxiv(base: ArxivConfig, overlay: ArxivConfig) -> ArxivConfig {
    let default = ArxivConfig::default();
    ArxivConfig {
        api_base: pick(base.api_base, overlay.api_base, default.api_base),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
        sort_by: pick(base.sort_by, overlay.sort_by, default.sort_by),
    }
}

fn merge_llm(base: LlmConfig, overlay: LlmConfig) -> LlmConfig {
    let default = LlmConfig::default();
    LlmConfig {
        model: pick(base.model, overlay.model, default.model),
        max_tokens: pick(base.max_tokens, overlay.max_tokens, default.max_tokens),
        api_base: overlay.api_base.or(base.api_base),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
        temperature: pick_f32(base.temperature, overlay.temperature, default.temperature),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        model_name: pick(base.model_name, overlay.model_name, default.model_name),
        batch_size: pick(base.batch_size, overlay.batch_size, default.batch_size),
        api_base: overlay.api_base.or(base.api_base),
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        chunk_size: pick(base.chunk_size, overlay.chunk_size, default.chunk_size),
        chunk_overlap: pick(base.chunk_overlap, overlay.chunk_overlap, default.chunk_overlap),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        top_n: pick(base.top_n, overlay.top_n, default.top_n),
        similarity_top_k: pick(
            base.similarity_top_k,
            overlay.similarity_top_k,
            default.similarity_top_k,
        ),
        base_similarity_top_k: pick(
            base.base_similarity_top_k,
            overlay.base_similarity_top_k,
            default.base_similarity_top_k,
        ),
        rerank: pick(base.rerank, overlay.rerank, default.rerank),
    }
}

fn merge_summary(base: SummaryConfig, overlay: SummaryConfig) -> SummaryConfig {
    let default = SummaryConfig::default();
    SummaryConfig {
        context_budget_tokens: pick(
            base.context_budget_tokens,
            overlay.context_budget_tokens,
            default.context_budget_tokens,
        ),
        memory_token_limit: pick(
            base.memory_token_limit,
            overlay.memory_token_limit,
            default.memory_token_limit,
        ),
        summary_query: pick(base.summary_query, overlay.summary_query, default.summary_query),
    }
}

fn merge_agent(base: AgentConfig, overlay: AgentConfig) -> AgentConfig {
    let default = AgentConfig::default();
    AgentConfig {
        max_iterations: pick(base.max_iterations, overlay.max_iterations, default.max_iterations),
        paper_agent_max_steps: pick(
            base.paper_agent_max_steps,
            overlay.paper_agent_max_steps,
            default.paper_agent_max_steps,
        ),
        step_timeout_secs: pick(
            base.step_timeout_secs,
            overlay.step_timeout_secs,
            default.step_timeout_secs,
        ),
        verbose: base.verbose || overlay.verbose,
    }
}
