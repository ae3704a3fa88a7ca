//! Shared test doubles and corpus fixtures for PsalmSeeker integration tests.
//!
//! Stubs implement the capability traits from `psalm-core` so tests run with
//! no local model service.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use psalm_core::errors::{CapabilityError, CapabilityFailure, InputError, PsalmResult};
use psalm_core::traits::{IEmbedder, IReflectionGenerator};

/// Directory holding fixture data files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Absolute path of a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Read a fixture file as text.
///
/// # Panics
/// Panics if the file is missing.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Verse-level Bible JSON with Psalms 23, 46, 131 and some rows to filter out.
pub fn bible_sample_json() -> String {
    load_fixture_text("bible_sample.json")
}

/// Three plain passages: `unit_1`, `unit_2`, `unit_3`.
pub fn three_unit_corpus() -> &'static str {
    "Be still\n\nThe Lord is near\n\nTrust and wait\n"
}

/// Corpus of `n` positional passages with distinct words.
pub fn numbered_corpus(n: usize) -> String {
    (1..=n)
        .map(|i| format!("Passage number {i} speaks of word{i}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ═══════════════════════════════════════════════════════════════════════════
// EMBEDDERS
// ═══════════════════════════════════════════════════════════════════════════

/// Keyword-rule embedder. The first rule whose needle occurs in the text
/// (case-insensitive) supplies the vector; otherwise the default vector.
pub struct StubEmbedder {
    rules: Vec<(String, Vec<f32>)>,
    default: Vec<f32>,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(rules: Vec<(&str, Vec<f32>)>, default: Vec<f32>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(needle, v)| (needle.to_lowercase(), v))
                .collect(),
            default,
            calls: AtomicUsize::new(0),
        }
    }

    /// Ranks `unit_3` ("Trust and wait") highest for queries about waiting.
    pub fn three_unit() -> Self {
        Self::new(
            vec![
                ("be still", vec![1.0, 0.0, 0.0]),
                ("lord is near", vec![0.0, 1.0, 0.0]),
                ("trust and wait", vec![0.0, 0.0, 1.0]),
                ("wait", vec![0.05, 0.1, 1.0]),
                ("near", vec![0.1, 1.0, 0.05]),
            ],
            vec![0.5, 0.5, 0.5],
        )
    }

    /// Number of texts embedded so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IEmbedder for StubEmbedder {
    fn embed(&self, text: &str) -> PsalmResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(InputError::EmptyText.into());
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        Ok(self
            .rules
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default.clone()))
    }

    fn model_name(&self) -> &str {
        "stub"
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.default.len())
    }
}

/// Succeeds for the first `succeed_for` texts, then fails every call.
pub struct FailingEmbedder {
    succeed_for: usize,
    kind: CapabilityFailure,
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn new(kind: CapabilityFailure) -> Self {
        Self::after(0, kind)
    }

    pub fn after(succeed_for: usize, kind: CapabilityFailure) -> Self {
        Self {
            succeed_for,
            kind,
            calls: AtomicUsize::new(0),
        }
    }
}

impl IEmbedder for FailingEmbedder {
    fn embed(&self, text: &str) -> PsalmResult<Vec<f32>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.succeed_for {
            Ok(vec![1.0, text.len() as f32])
        } else {
            Err(CapabilityError::embedding(self.kind, "stub embedder failure").into())
        }
    }

    fn model_name(&self) -> &str {
        "failing-stub"
    }

    fn dimensions(&self) -> Option<usize> {
        Some(2)
    }
}

/// Returns a vector of the wrong width on the `nth` call (0-based).
pub struct RaggedEmbedder {
    nth: usize,
    calls: AtomicUsize,
}

impl RaggedEmbedder {
    pub fn new(nth: usize) -> Self {
        Self {
            nth,
            calls: AtomicUsize::new(0),
        }
    }
}

impl IEmbedder for RaggedEmbedder {
    fn embed(&self, _text: &str) -> PsalmResult<Vec<f32>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if n == self.nth {
            vec![1.0, 0.0, 0.0, 0.0]
        } else {
            vec![1.0, 0.0, 0.0]
        })
    }

    fn model_name(&self) -> &str {
        "ragged-stub"
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GENERATORS
// ═══════════════════════════════════════════════════════════════════════════

/// Replays a script of outcomes, one per call. Repeats the last when exhausted.
pub struct StubGenerator {
    script: Mutex<VecDeque<Result<String, CapabilityFailure>>>,
    last: Mutex<Option<Result<String, CapabilityFailure>>>,
    prompts: Mutex<Vec<(String, String)>>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(script: Vec<Result<String, CapabilityFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always replies with `text`.
    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Always fails with `kind`.
    pub fn failing(kind: CapabilityFailure) -> Self {
        Self::new(vec![Err(kind)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(passage, intent)` of every call, in order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl IReflectionGenerator for StubGenerator {
    fn generate(&self, passage: &str, intent: &str) -> PsalmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((passage.to_string(), intent.to_string()));

        let next = self.script.lock().unwrap().pop_front();
        let outcome = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = next {
                *last = Some(next);
            }
            last.clone()
                .unwrap_or(Err(CapabilityFailure::MalformedResponse))
        };
        outcome.map_err(|kind| CapabilityError::generation(kind, "stub generator failure").into())
    }

    fn model_name(&self) -> &str {
        "stub-llm"
    }
}

/// Generator that blocks inside `generate` until released.
///
/// `entered` fires once the call is in flight; sending on `release` lets it
/// return `reply`.
pub struct GatedGenerator {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
    reply: String,
}

pub struct Gate {
    pub entered: Receiver<()>,
    pub release: Sender<()>,
}

impl GatedGenerator {
    pub fn new(reply: &str) -> (Self, Gate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        (
            Self {
                entered: Mutex::new(entered_tx),
                release: Mutex::new(release_rx),
                reply: reply.to_string(),
            },
            Gate {
                entered: entered_rx,
                release: release_tx,
            },
        )
    }
}

impl IReflectionGenerator for GatedGenerator {
    fn generate(&self, _passage: &str, _intent: &str) -> PsalmResult<String> {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "gated-stub"
    }
}
