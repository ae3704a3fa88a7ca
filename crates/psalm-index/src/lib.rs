//! # psalm-index
//!
//! Everything between raw corpus text and a loaded, validated index:
//!
//! - [`psalter`]: verse-level Bible JSON to headed passage text
//! - [`chunker`]: corpus text to ordered [`CorpusUnit`](psalm_core::CorpusUnit)s
//! - [`builder`]: units to an embedded, atomically published artifact
//! - [`store`]: the read-only, validated artifact used at query time

pub mod builder;
pub mod chunker;
pub mod format;
pub mod psalter;
pub mod store;

pub use builder::IndexBuilder;
pub use chunker::chunk;
pub use psalter::prepare_psalter;
pub use store::IndexStore;
