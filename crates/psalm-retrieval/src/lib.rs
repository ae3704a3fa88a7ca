//! # psalm-retrieval
//!
//! Exact top-k retrieval: embed the query, score every record by cosine
//! similarity, order by score then reading order.

pub mod engine;
pub mod similarity;

pub use engine::Retriever;
pub use similarity::cosine_similarity;
