pub mod extractor;
pub mod planner;
pub mod responder;
pub mod retriever;
pub mod scorer;
pub mod suggestions;
pub mod summarizer;

pub use planner::Intent;
pub use responder::ResponderAgent;
pub use retriever::RetrieverAgent;
