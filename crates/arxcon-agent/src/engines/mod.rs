pub mod sub_question;
pub mod summary;
pub mod synthesizer;
pub mod vector;

pub use sub_question::SubQuestionQueryEngine;
pub use summary::SummaryQueryEngine;
pub use synthesizer::ResponseSynthesizer;
pub use vector::VectorQueryEngine;
