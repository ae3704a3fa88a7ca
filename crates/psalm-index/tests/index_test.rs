//! Builder and store: artifact publishing, validation, staleness.

use std::path::Path;

use psalm_core::config::StalenessPolicy;
use psalm_core::errors::{CapabilityError, CapabilityFailure, IndexError};
use psalm_core::models::corpus_checksum;
use psalm_core::{ErrorCategory, PsalmError};
use psalm_index::{format, IndexBuilder, IndexStore};
use serde_json::Value;
use tempfile::TempDir;
use test_fixtures::{FailingEmbedder, RaggedEmbedder, StubEmbedder};

fn write_corpus(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("psalms.txt");
    std::fs::write(&path, text).unwrap();
    path
}

fn build_three_unit(dir: &Path) -> std::path::PathBuf {
    let corpus = write_corpus(dir, test_fixtures::three_unit_corpus());
    let out = dir.join("storage").join("psalms_index.json");
    let embedder = StubEmbedder::three_unit();
    IndexBuilder::new(&embedder, 2)
        .build_index(&corpus, &out)
        .unwrap();
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILD
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn build_records_header_and_units_in_order() {
    let embedder = StubEmbedder::three_unit();
    let index = IndexBuilder::new(&embedder, 2)
        .build(test_fixtures::three_unit_corpus())
        .unwrap();

    assert_eq!(index.header.unit_count, 3);
    assert_eq!(index.header.dimensionality, 3);
    assert_eq!(index.header.embedding_model_name, "stub");
    assert_eq!(
        index.header.corpus_checksum,
        corpus_checksum([test_fixtures::three_unit_corpus()])
    );
    let ids: Vec<&str> = index.records.iter().map(|r| r.unit_id.as_str()).collect();
    assert_eq!(ids, ["unit_1", "unit_2", "unit_3"]);
    assert_eq!(index.records[2].vector, vec![0.0, 0.0, 1.0]);
    assert_eq!(embedder.calls(), 3);
}

#[test]
fn build_index_creates_parent_dirs_and_loads_back() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());

    let store = IndexStore::load(&out).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.lookup("unit_2"), Some("The Lord is near"));
    assert_eq!(store.unit("unit_3").map(|r| r.order), Some(2));
    assert!(store.lookup("unit_9").is_none());
    assert_eq!(store.all()[0].unit_id, "unit_1");
}

#[test]
fn rebuild_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let first = std::fs::read(&out).unwrap();

    let out_again = build_three_unit(dir.path());
    let second = std::fs::read(&out_again).unwrap();
    assert_eq!(first, second);
}

#[test]
fn embed_failure_aborts_and_keeps_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let before = std::fs::read(&out).unwrap();

    let corpus = write_corpus(dir.path(), "one\n\ntwo\n\nthree\n\nfour\n");
    let embedder = FailingEmbedder::after(2, CapabilityFailure::Timeout);
    let err = IndexBuilder::new(&embedder, 1)
        .build_index(&corpus, &out)
        .unwrap_err();

    match &err {
        PsalmError::BuildIncomplete {
            embedded, total, source,
        } => {
            assert_eq!((*embedded, *total), (2, 4));
            assert!(matches!(
                source,
                CapabilityError::EmbeddingUnavailable {
                    kind: CapabilityFailure::Timeout,
                    ..
                }
            ));
        }
        other => panic!("expected BuildIncomplete, got {other:?}"),
    }
    assert_eq!(err.category(), ErrorCategory::CapabilityUnavailable);
    assert_eq!(std::fs::read(&out).unwrap(), before);
}

#[test]
fn failure_on_first_batch_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    let corpus = write_corpus(dir.path(), test_fixtures::three_unit_corpus());
    let out = dir.path().join("index.json");

    let embedder = FailingEmbedder::new(CapabilityFailure::Unreachable);
    let err = IndexBuilder::new(&embedder, 16)
        .build_index(&corpus, &out)
        .unwrap_err();
    assert!(matches!(err, PsalmError::BuildIncomplete { embedded: 0, total: 3, .. }));
    assert!(!out.exists());
}

#[test]
fn non_finite_vector_aborts_and_keeps_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let before = std::fs::read(&out).unwrap();

    let corpus = write_corpus(dir.path(), test_fixtures::three_unit_corpus());
    let embedder = StubEmbedder::new(
        vec![("trust and wait", vec![f32::NAN, 1.0, 0.0])],
        vec![0.5, 0.5, 0.5],
    );
    let err = IndexBuilder::new(&embedder, 1)
        .build_index(&corpus, &out)
        .unwrap_err();

    assert!(matches!(
        err,
        PsalmError::BuildIncomplete {
            embedded: 2,
            total: 3,
            source: CapabilityError::EmbeddingUnavailable {
                kind: CapabilityFailure::MalformedResponse,
                ..
            },
        }
    ));
    assert_eq!(std::fs::read(&out).unwrap(), before);
    assert!(IndexStore::load(&out).is_ok());
}

#[test]
fn infinite_value_is_rejected_in_memory_too() {
    let embedder = StubEmbedder::new(vec![("be still", vec![f32::INFINITY, 0.0])], vec![1.0, 1.0]);
    let err = IndexBuilder::new(&embedder, 8)
        .build(test_fixtures::three_unit_corpus())
        .unwrap_err();
    assert!(matches!(err, PsalmError::BuildIncomplete { embedded: 0, total: 3, .. }));
}

#[test]
fn inconsistent_vector_length_aborts() {
    let embedder = RaggedEmbedder::new(1);
    let err = IndexBuilder::new(&embedder, 8)
        .build(test_fixtures::three_unit_corpus())
        .unwrap_err();
    assert!(matches!(
        err,
        PsalmError::BuildIncomplete {
            embedded: 1,
            source: CapabilityError::DimensionMismatch { expected: 3, actual: 4 },
            ..
        }
    ));
}

#[test]
fn empty_corpus_is_input_error() {
    let embedder = StubEmbedder::three_unit();
    let err = IndexBuilder::new(&embedder, 4).build(" \n ").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Input);
    assert_eq!(embedder.calls(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// LOAD & VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

fn tamper(path: &Path, edit: impl FnOnce(&mut Value)) {
    let mut doc: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    edit(&mut doc);
    std::fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
}

fn assert_corrupt(path: &Path) {
    let err = IndexStore::load(path).unwrap_err();
    assert!(
        matches!(err, PsalmError::IndexError(IndexError::Corrupt { .. })),
        "expected Corrupt, got {err:?}"
    );
    assert_eq!(err.category(), ErrorCategory::IndexIntegrity);
}

#[test]
fn missing_artifact_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = IndexStore::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, PsalmError::IndexError(IndexError::Missing { .. })));
}

#[test]
fn unit_count_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    tamper(&out, |doc| doc["header"]["unit_count"] = Value::from(4));
    assert_corrupt(&out);
}

#[test]
fn truncated_artifact_is_rejected() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let bytes = std::fs::read(&out).unwrap();
    std::fs::write(&out, &bytes[..bytes.len() / 2]).unwrap();
    assert_corrupt(&out);
}

#[test]
fn wrong_vector_length_is_rejected() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    tamper(&out, |doc| {
        doc["records"][1]["vector"] = serde_json::json!([0.0, 1.0]);
    });
    assert_corrupt(&out);
}

#[test]
fn unknown_format_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    tamper(&out, |doc| doc["header"]["format_version"] = Value::from(99));
    assert_corrupt(&out);
}

#[test]
fn duplicate_ids_are_rejected() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    tamper(&out, |doc| doc["records"][2]["unit_id"] = Value::from("unit_1"));
    assert_corrupt(&out);
}

#[test]
fn edited_record_text_is_rejected() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    tamper(&out, |doc| doc["records"][0]["text"] = Value::from("Be loud\n\n"));
    assert_corrupt(&out);
}

#[test]
fn from_index_applies_same_validation() {
    let embedder = StubEmbedder::three_unit();
    let mut index = IndexBuilder::new(&embedder, 4)
        .build(test_fixtures::three_unit_corpus())
        .unwrap();
    index.header.unit_count = 2;
    assert!(IndexStore::from_index(index).is_err());
}

#[test]
fn serialized_form_round_trips_through_validation() {
    let embedder = StubEmbedder::three_unit();
    let index = IndexBuilder::new(&embedder, 4)
        .build(test_fixtures::three_unit_corpus())
        .unwrap();
    let bytes = format::to_bytes(&index).unwrap();
    assert_eq!(format::from_slice("mem", &bytes).unwrap(), index);
}

// ═══════════════════════════════════════════════════════════════════════════
// STALENESS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn fresh_corpus_loads_under_refuse() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let store = IndexStore::load_checked(
        &out,
        test_fixtures::three_unit_corpus(),
        StalenessPolicy::Refuse,
    )
    .unwrap();
    assert_eq!(store.len(), 3);
}

#[test]
fn stale_corpus_warns_by_default() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let store = IndexStore::load_checked(&out, "Be still\n", StalenessPolicy::default()).unwrap();
    assert_eq!(store.len(), 3);
}

#[test]
fn stale_corpus_refused_when_configured() {
    let dir = TempDir::new().unwrap();
    let out = build_three_unit(dir.path());
    let err = IndexStore::load_checked(&out, "Be still\n", StalenessPolicy::Refuse).unwrap_err();
    assert!(matches!(err, PsalmError::IndexError(IndexError::Stale { .. })));
}
