pub mod splitter;
pub mod tokenizer;

pub use splitter::SentenceSplitter;
pub use tokenizer::count_tokens;
