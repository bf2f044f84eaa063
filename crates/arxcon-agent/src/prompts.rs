pub const CONSULTANT_PROMPT: &str = r#"You are an IP consultant designed to answer queries about the documentation.
ALWAYS use ONLY the AVAILABLE tools provided to answer a question. Do not rely on ANY PRIOR knowledge.
You are responsible for the following tasks based on user query:
1) Check if the user idea is relevant across any of the documents.
2) If you are not able to provide answer with existing knowledge, respond with a note something like
  "The query looks like not in my knowledge. It might either be novel or my knowledge is limited"
3) Strictly adhere to the provided knowledge, else you will be heavily PENALIZED."#;

pub const REACT_FORMAT: &str = r#"# OUTPUT FORMAT
You operate in a loop of THOUGHT -> TOOL_CALL -> OBSERVATION.
- Always start your response with `THOUGHT:` explaining what you know and what is missing.
- To use a tool, follow the thought with a single line:
  TOOL_CALL: {"tool_name": "<tool name>", "args": {"input": "<query for the tool>"}}
- After a TOOL_CALL you will receive an `OBSERVATION:` with the tool's output.
- When you have enough information, respond with:
  FINAL_ANSWER: <your answer>
Call at most one tool per response. Use tool names exactly as listed."#;

pub const COMPARE_TOOL_DESCRIPTION: &str = "Useful for any queries that involve comparing multiple documents. ALWAYS use this tool for comparison queries - make sure to call this tool with the original query. Do NOT use the other tools for any queries involving multiple documents.";

pub const BASE_ENGINE_DESCRIPTION: &str =
    "Contains the information of all the related documents in one tool";

pub const VECTOR_TOOL_DESCRIPTION: &str = "Useful for questions related to specific facts";

pub const SUMMARY_TOOL_DESCRIPTION: &str = "Useful for summarization questions";

pub fn paper_agent_prompt(paper_name: &str) -> String {
    format!(
        "You are a specialized agent designed to answer queries about the `{paper}`.\n\
         Be intelligent to choose the appropriate tool for answering the query.\n\
         Use vector_tool_{paper} for answering generic query.\n\
         Use summary_tool_{paper} for answering questions related to summarization.\n\
         You must ALWAYS use at least one of the tools provided when answering a question;\n\
         Do NOT rely on prior knowledge else you will be heavily penalized.",
        paper = paper_name
    )
}

/// Full system prompt of the top-level agent for this turn's tools
pub fn consultant_system_prompt(tools: &[(String, String, String)]) -> String {
    let mut prompt = CONSULTANT_PROMPT.to_string();
    prompt.push_str("\n\n# AVAILABLE TOOLS\n");
    for (name, description, schema) in tools {
        prompt.push_str(&format!(
            "- {}: {}\n  Schema: {}\n",
            name,
            description.trim(),
            schema
        ));
    }
    prompt.push('\n');
    prompt.push_str(REACT_FORMAT);
    prompt
}

pub fn text_qa(context: &str, query: &str) -> String {
    format!(
        "Context information is below.\n\
         ---------------------\n\
         {context}\n\
         ---------------------\n\
         Given the context information and not prior knowledge, answer the query.\n\
         Query: {query}\n\
         Answer: "
    )
}

pub fn refine(query: &str, existing_answer: &str, context: &str) -> String {
    format!(
        "The original query is as follows: {query}\n\
         We have provided an existing answer: {existing_answer}\n\
         We have the opportunity to refine the existing answer (only if needed) with some more context below.\n\
         ------------\n\
         {context}\n\
         ------------\n\
         Given the new context, refine the original answer to better answer the query. \
         If the context isn't useful, return the original answer.\n\
         Refined Answer: "
    )
}

pub fn tree_summarize(context: &str, query: &str) -> String {
    format!(
        "Context information from multiple sources is below.\n\
         ---------------------\n\
         {context}\n\
         ---------------------\n\
         Given the information from multiple sources and not prior knowledge, answer the query.\n\
         Query: {query}\n\
         Answer: "
    )
}

/// Ask for a JSON plan of sub-questions over the named tools
pub fn sub_question_plan(tools_json: &str, query: &str) -> String {
    format!(
        "Given a user question and a list of tools, output a list of relevant sub-questions \
         that, when answered, would help answer the user question. Each sub-question must name \
         exactly one tool from the list.\n\n\
         # Tools\n{tools_json}\n\n\
         # User Question\n{query}\n\n\
         Respond with only a JSON array, for example:\n\
         [{{\"sub_question\": \"What is the main contribution?\", \"tool_name\": \"tool_2401_01234v2\"}}]\n\
         # Sub Questions\n"
    )
}

pub fn rerank_score(query: &str, candidate: &str) -> String {
    format!(
        "Rate how relevant the following document description is to the query, \
         on a scale from 0 (irrelevant) to 10 (directly answers it).\n\n\
         Query: {query}\n\n\
         Document description:\n{candidate}\n\n\
         Respond with only JSON of the form {{\"score\": <number>}}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_prompt_names_both_tools() {
        let prompt = paper_agent_prompt("2401_01234v2");
        assert!(prompt.contains("`2401_01234v2`"));
        assert!(prompt.contains("vector_tool_2401_01234v2"));
        assert!(prompt.contains("summary_tool_2401_01234v2"));
    }

    #[test]
    fn system_prompt_lists_tools_then_format() {
        let prompt = consultant_system_prompt(&[(
            "compare_tool".to_string(),
            COMPARE_TOOL_DESCRIPTION.to_string(),
            "{}".to_string(),
        )]);
        let tools_at = prompt.find("- compare_tool:").unwrap();
        let format_at = prompt.find("# OUTPUT FORMAT").unwrap();
        assert!(prompt.starts_with("You are an IP consultant"));
        assert!(tools_at < format_at);
    }

    #[test]
    fn qa_template_layout() {
        let p = text_qa("CTX", "Q?");
        assert!(p.starts_with("Context information is below.\n---------------------\nCTX\n"));
        assert!(p.ends_with("Query: Q?\nAnswer: "));
    }
}
