// Single source of truth for all default values.

// --- Local model service ---
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_CAPABILITY_TIMEOUT_SECS: u64 = 120;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "ollama";
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 16;
pub const DEFAULT_HASHING_DIMENSIONS: usize = 256;

// --- Generation ---
pub const DEFAULT_LLM_MODEL: &str = "llama3:8b";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a reverent biblical guide. Speak with humility. \
Do not claim new revelation. Use Scripture-centered language. \
Offer: (1) a short summary of what the Psalm is doing, \
(2) a gentle invitation to respond in prayer, \
(3) 2-3 journaling questions. \
Avoid manipulative or condemnatory tone.";

// --- Index ---
pub const DEFAULT_INDEX_PATH: &str = "storage/psalms_index.json";
pub const DEFAULT_CORPUS_PATH: &str = "data/psalms.txt";

// --- Chunking ---
pub const DEFAULT_BLOCK_VERSES: usize = 8;
pub const DEFAULT_WHOLE_IF_AT_MOST: usize = 10;
pub const DEFAULT_INCLUDE_VERSE_NUMBERS: bool = true;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 5;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
