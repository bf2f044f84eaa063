pub mod object;
pub mod similarity;
pub mod summaries;
pub mod vector;

pub use object::ObjectIndex;
pub use similarity::{cosine_similarity, top_k};
pub use summaries::{SummaryRecord, SummaryStore};
pub use vector::{vector_dir, ScoredNode, VectorIndex};
