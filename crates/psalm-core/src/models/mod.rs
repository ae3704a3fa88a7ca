mod corpus_unit;
mod index;
mod posture;
mod retrieval_result;
mod session;

pub use corpus_unit::{corpus_checksum, CorpusUnit};
pub use index::{EmbeddingRecord, Index, IndexHeader};
pub use posture::{Mood, Posture};
pub use retrieval_result::{RetrievalHit, RetrievalResult};
pub use session::{Session, Stage};
