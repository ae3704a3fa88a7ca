//! Stage guards, transitions, reflection outcomes, and busy handling.

use std::sync::Arc;
use std::thread;

use psalm_core::errors::{CapabilityError, CapabilityFailure, InputError, StageError};
use psalm_core::models::{Mood, Posture, Session, Stage};
use psalm_core::traits::{IEmbedder, IReflectionGenerator};
use psalm_core::{ErrorCategory, PsalmError, PsalmResult};
use psalm_index::{IndexBuilder, IndexStore};
use psalm_journey::Journey;
use test_fixtures::{FailingEmbedder, GatedGenerator, StubEmbedder, StubGenerator};

fn store(embedder: &StubEmbedder) -> Arc<IndexStore> {
    let index = IndexBuilder::new(embedder, 4)
        .build(test_fixtures::three_unit_corpus())
        .unwrap();
    Arc::new(IndexStore::from_index(index).unwrap())
}

fn journey_with(generator: Arc<dyn IReflectionGenerator>) -> Journey {
    let embedder = Arc::new(StubEmbedder::three_unit());
    Journey::new(store(&embedder), embedder, generator)
}

fn in_courts(generator: Arc<dyn IReflectionGenerator>) -> Journey {
    let journey = journey_with(generator);
    journey.confirm_posture().unwrap();
    journey
}

fn assert_guard(result: PsalmResult<Session>, operation: &str, stage: Stage) {
    match result {
        Err(PsalmError::StageError(StageError::StageGuard {
            operation: op,
            stage: at,
        })) => {
            assert_eq!(op, operation);
            assert_eq!(at, stage);
        }
        other => panic!("expected StageGuard for {operation} at {stage}, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GATES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn new_journey_starts_at_gates() {
    let journey = journey_with(Arc::new(StubGenerator::replying("ok")));
    let session = journey.snapshot().unwrap();
    assert_eq!(session.stage, Stage::Gates);
    assert!(!session.posture_confirmed);
    assert!(session.last_results.is_none());
}

#[test]
fn retrieve_and_select_are_guarded_at_gates() {
    let journey = journey_with(Arc::new(StubGenerator::replying("ok")));
    let before = journey.snapshot().unwrap();

    assert_guard(journey.retrieve("waiting on God", 3), "retrieve", Stage::Gates);
    assert_guard(journey.select_unit("unit_3"), "select_unit", Stage::Gates);
    assert_guard(journey.retry_reflection(), "retry_reflection", Stage::Gates);

    let after = journey.snapshot().unwrap();
    assert!(after.same_progress(&before));
    assert_eq!(after.session_id, before.session_id);
}

#[test]
fn confirm_posture_opens_courts() {
    let journey = journey_with(Arc::new(StubGenerator::replying("ok")));
    let posture = Posture::new(Mood::WaitingStrength, "I am tired of waiting");
    let session = journey.confirm_posture_with(posture.clone()).unwrap();

    assert_eq!(session.stage, Stage::Courts);
    assert!(session.posture_confirmed);
    assert_eq!(session.posture, Some(posture));
}

#[test]
fn confirm_posture_twice_is_guarded() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    let before = journey.snapshot().unwrap();
    assert_guard(journey.confirm_posture(), "confirm_posture", Stage::Courts);
    assert!(journey.snapshot().unwrap().same_progress(&before));
}

// ═══════════════════════════════════════════════════════════════════════════
// COURTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn retrieve_stores_results_and_stays_in_courts() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    let session = journey.retrieve("waiting on God", 2).unwrap();

    assert_eq!(session.stage, Stage::Courts);
    let results = session.last_results.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.hits[0].unit_id, "unit_3");
    assert_eq!(session.last_query.as_deref(), Some("waiting on God"));
}

#[test]
fn repeated_retrieve_replaces_previous_results() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    journey.retrieve("waiting on God", 1).unwrap();
    let session = journey.retrieve("the Lord draws near", 1).unwrap();
    assert_eq!(session.last_results.unwrap().unit_ids(), ["unit_2"]);
}

#[test]
fn mood_prefix_reaches_the_embedder() {
    let embedder = Arc::new(StubEmbedder::new(
        vec![
            ("be still", vec![1.0, 0.0, 0.0]),
            ("lord is near", vec![0.0, 1.0, 0.0]),
            ("trust and wait", vec![0.0, 0.0, 1.0]),
            ("refuge", vec![0.0, 1.0, 0.1]),
        ],
        vec![1.0, 0.1, 0.0],
    ));
    let journey = Journey::new(
        store(&embedder),
        embedder,
        Arc::new(StubGenerator::replying("ok")),
    );

    journey
        .confirm_posture_with(Posture::new(Mood::FearRefuge, ""))
        .unwrap();
    // Without the prefix this query falls to the default vector (unit_1).
    let session = journey.retrieve("hold me", 1).unwrap();
    assert_eq!(session.last_results.unwrap().unit_ids(), ["unit_2"]);
}

#[test]
fn invalid_input_leaves_session_unchanged() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    let before = journey.snapshot().unwrap();

    let err = journey.retrieve("   ", 3).unwrap_err();
    assert!(matches!(err, PsalmError::InputError(InputError::EmptyQuery)));
    let err = journey.retrieve("waiting", 0).unwrap_err();
    assert!(matches!(err, PsalmError::InputError(InputError::InvalidK { k: 0 })));

    assert!(journey.snapshot().unwrap().same_progress(&before));
}

#[test]
fn embedding_failure_leaves_session_unchanged() {
    let stub = StubEmbedder::three_unit();
    let failing: Arc<dyn IEmbedder> = Arc::new(FailingEmbedder::new(CapabilityFailure::Unreachable));
    let journey = Journey::new(store(&stub), failing, Arc::new(StubGenerator::replying("ok")));
    journey.confirm_posture().unwrap();
    let before = journey.snapshot().unwrap();

    let err = journey.retrieve("waiting on God", 3).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::CapabilityUnavailable);
    assert!(journey.snapshot().unwrap().same_progress(&before));
}

#[test]
fn select_before_retrieve_is_no_retrieval_yet() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    let err = journey.select_unit("unit_3").unwrap_err();
    assert!(matches!(err, PsalmError::StageError(StageError::NoRetrievalYet)));
    assert_eq!(err.category(), ErrorCategory::OutOfOrder);
    assert_eq!(journey.snapshot().unwrap().stage, Stage::Courts);
}

#[test]
fn select_outside_last_results_is_invalid() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    journey.retrieve("waiting on God", 1).unwrap();
    let before = journey.snapshot().unwrap();

    for id in ["unit_1", "unit_99"] {
        let err = journey.select_unit(id).unwrap_err();
        assert!(matches!(
            err,
            PsalmError::StageError(StageError::InvalidSelection { ref unit_id }) if unit_id == id
        ));
    }
    assert!(journey.snapshot().unwrap().same_progress(&before));
}

// ═══════════════════════════════════════════════════════════════════════════
// HOLY OF HOLIES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn select_generates_exactly_one_reflection() {
    let generator = Arc::new(StubGenerator::replying("Wait, and be strengthened."));
    let journey = in_courts(generator.clone());
    journey.retrieve("waiting on God", 3).unwrap();

    let session = journey.select_unit("unit_3").unwrap();
    assert_eq!(session.stage, Stage::HolyOfHolies);
    assert_eq!(session.selected_unit_id.as_deref(), Some("unit_3"));
    assert_eq!(session.reflection_text.as_deref(), Some("Wait, and be strengthened."));
    assert!(session.is_complete());

    assert_eq!(generator.calls(), 1);
    let (passage, intent) = &generator.prompts()[0];
    assert_eq!(passage, "Trust and wait");
    assert!(intent.contains("waiting on God"));
    assert!(intent.contains("entering God's courts"));
}

#[test]
fn posture_text_shapes_the_intent() {
    let generator = Arc::new(StubGenerator::replying("ok"));
    let journey = journey_with(generator.clone());
    journey
        .confirm_posture_with(Posture::new(Mood::None, "I am weary"))
        .unwrap();
    journey.retrieve("waiting on God", 3).unwrap();
    journey.select_unit("unit_3").unwrap();

    let (_, intent) = &generator.prompts()[0];
    assert!(intent.contains("I am weary"));
    assert!(!intent.contains("waiting on God"));
}

#[test]
fn every_operation_but_restart_is_guarded_once_complete() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    journey.retrieve("waiting on God", 3).unwrap();
    journey.select_unit("unit_3").unwrap();
    let before = journey.snapshot().unwrap();

    assert_guard(journey.confirm_posture(), "confirm_posture", Stage::HolyOfHolies);
    assert_guard(journey.retrieve("more", 3), "retrieve", Stage::HolyOfHolies);
    assert_guard(journey.select_unit("unit_1"), "select_unit", Stage::HolyOfHolies);
    assert_guard(journey.retry_reflection(), "retry_reflection", Stage::HolyOfHolies);

    assert!(journey.snapshot().unwrap().same_progress(&before));
}

#[test]
fn generation_failure_stays_in_holy_of_holies_without_reflection() {
    let generator = Arc::new(StubGenerator::failing(CapabilityFailure::Timeout));
    let journey = in_courts(generator.clone());
    journey.retrieve("waiting on God", 3).unwrap();

    let err = journey.select_unit("unit_3").unwrap_err();
    assert!(matches!(
        err,
        PsalmError::CapabilityError(CapabilityError::GenerationUnavailable {
            kind: CapabilityFailure::Timeout,
            ..
        })
    ));
    let session = journey.snapshot().unwrap();
    assert_eq!(session.stage, Stage::HolyOfHolies);
    assert_eq!(session.selected_unit_id.as_deref(), Some("unit_3"));
    assert!(session.reflection_text.is_none());
    assert_eq!(generator.calls(), 1);
}

#[test]
fn blank_reflection_is_rejected() {
    let journey = in_courts(Arc::new(StubGenerator::replying("   ")));
    journey.retrieve("waiting on God", 3).unwrap();

    let err = journey.select_unit("unit_3").unwrap_err();
    assert!(matches!(
        err,
        PsalmError::CapabilityError(CapabilityError::EmptyReflection)
    ));
    assert!(journey.snapshot().unwrap().reflection_text.is_none());
}

#[test]
fn retry_reflection_recovers_after_failure() {
    let generator = Arc::new(StubGenerator::new(vec![
        Err(CapabilityFailure::Unreachable),
        Ok("Be still, and rest.".to_string()),
    ]));
    let journey = in_courts(generator.clone());
    journey.retrieve("waiting on God", 3).unwrap();
    assert!(journey.select_unit("unit_3").is_err());

    let session = journey.retry_reflection().unwrap();
    assert_eq!(session.reflection_text.as_deref(), Some("Be still, and rest."));
    assert_eq!(generator.calls(), 2);

    assert_guard(journey.retry_reflection(), "retry_reflection", Stage::HolyOfHolies);
    assert_eq!(generator.calls(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// RESTART & CONCURRENCY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn restart_equals_a_fresh_session() {
    let journey = in_courts(Arc::new(StubGenerator::replying("ok")));
    journey.retrieve("waiting on God", 3).unwrap();
    journey.select_unit("unit_3").unwrap();
    let old_id = journey.snapshot().unwrap().session_id;

    let session = journey.restart().unwrap();
    assert!(session.same_progress(&Session::new()));
    assert_ne!(session.session_id, old_id);
    assert_eq!(session.stage, Stage::Gates);
}

#[test]
fn restart_is_available_at_every_stage() {
    let journey = journey_with(Arc::new(StubGenerator::replying("ok")));
    assert_eq!(journey.restart().unwrap().stage, Stage::Gates);
    journey.confirm_posture().unwrap();
    assert_eq!(journey.restart().unwrap().stage, Stage::Gates);
}

#[test]
fn operations_during_generation_report_busy() {
    let (generator, gate) = GatedGenerator::new("Rest here.");
    let journey = Arc::new(in_courts(Arc::new(generator)));
    journey.retrieve("waiting on God", 3).unwrap();

    let worker = {
        let journey = Arc::clone(&journey);
        thread::spawn(move || journey.select_unit("unit_3"))
    };
    gate.entered.recv().unwrap();

    for result in [
        journey.snapshot(),
        journey.retrieve("again", 1),
        journey.restart(),
        journey.retry_reflection(),
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err, PsalmError::SessionBusy));
        assert_eq!(err.category(), ErrorCategory::Busy);
    }

    gate.release.send(()).unwrap();
    let session = worker.join().unwrap().unwrap();
    assert!(session.is_complete());
    assert_eq!(journey.snapshot().unwrap().reflection_text.as_deref(), Some("Rest here."));
}

struct PanickingGenerator;

impl IReflectionGenerator for PanickingGenerator {
    fn generate(&self, _passage: &str, _intent: &str) -> PsalmResult<String> {
        panic!("generator crashed");
    }

    fn model_name(&self) -> &str {
        "panicking"
    }
}

#[test]
fn poisoned_session_is_recovered() {
    let journey = Arc::new(in_courts(Arc::new(PanickingGenerator)));
    journey.retrieve("waiting on God", 3).unwrap();

    let worker = {
        let journey = Arc::clone(&journey);
        thread::spawn(move || journey.select_unit("unit_3"))
    };
    assert!(worker.join().is_err());

    let session = journey.snapshot().unwrap();
    assert_eq!(session.stage, Stage::HolyOfHolies);
    assert!(session.reflection_text.is_none());
    assert_eq!(journey.restart().unwrap().stage, Stage::Gates);
}
