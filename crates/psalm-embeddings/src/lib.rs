//! # psalm-embeddings
//!
//! The two out-of-process capabilities behind narrow traits from `psalm-core`:
//! text embedding and reflection generation.
//!
//! ## Architecture
//!
//! ```text
//! providers
//! ├── OllamaEmbedder   (local service, /api/embed)
//! └── HashingEmbedder  (deterministic, offline)
//! generator
//! └── OllamaGenerator  (local service, /api/generate)
//! enrichment           (mood prefix for queries)
//! ```
//!
//! Every call is blocking and bounded by the configured timeout. Failures are
//! reported as `CapabilityError`; nothing here falls back to another provider.

pub mod enrichment;
pub mod generator;
mod http;
pub mod providers;

pub use generator::{create_generator, OllamaGenerator};
pub use providers::{create_embedder, HashingEmbedder, OllamaEmbedder};
