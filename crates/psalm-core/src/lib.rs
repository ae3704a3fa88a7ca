//! # psalm-core
//!
//! Foundation crate for the PsalmSeeker retrieval engine.
//! Defines the data model, capability traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PsalmConfig;
pub use errors::{ErrorCategory, PsalmError, PsalmResult};
pub use models::{
    CorpusUnit, EmbeddingRecord, Index, IndexHeader, Mood, Posture, RetrievalHit,
    RetrievalResult, Session, Stage,
};
pub use traits::{IEmbedder, IReflectionGenerator};
