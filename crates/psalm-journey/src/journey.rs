//! Journey state machine.
//!
//! ```text
//! Gates --confirm_posture--> Courts --select_unit--> HolyOfHolies
//!   ^                          |  ^                       |
//!   |                          retrieve (repeatable)      retry_reflection
//!   +------------------------- restart (any stage) -------+
//! ```
//!
//! The session sits behind a mutex. Operations take it with `try_lock`, so a
//! call made while another transition is in flight (typically a slow
//! generation) fails with `SessionBusy` instead of queueing.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use psalm_core::errors::{CapabilityError, InputError, PsalmError, PsalmResult, StageError};
use psalm_core::models::{Posture, Session, Stage};
use psalm_core::traits::{IEmbedder, IReflectionGenerator};
use psalm_embeddings::enrichment::enrich_query;
use psalm_index::IndexStore;
use psalm_observability::events;
use psalm_retrieval::Retriever;
use tracing::debug;

use crate::reflection::compose_intent;

pub struct Journey {
    session: Mutex<Session>,
    store: Arc<IndexStore>,
    embedder: Arc<dyn IEmbedder>,
    generator: Arc<dyn IReflectionGenerator>,
}

impl Journey {
    pub fn new(
        store: Arc<IndexStore>,
        embedder: Arc<dyn IEmbedder>,
        generator: Arc<dyn IReflectionGenerator>,
    ) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            store,
            embedder,
            generator,
        }
    }

    /// Confirm with no declared mood or text.
    pub fn confirm_posture(&self) -> PsalmResult<Session> {
        self.confirm_posture_with(Posture::default())
    }

    /// Gates only. Records the posture and opens the Courts.
    pub fn confirm_posture_with(&self, posture: Posture) -> PsalmResult<Session> {
        let mut session = self.lock()?;
        require_stage(&session, Stage::Gates, "confirm_posture")?;

        session.posture_confirmed = true;
        session.posture = Some(posture);
        advance(&mut session, Stage::Courts);
        Ok(session.clone())
    }

    /// Courts only. Replaces any earlier results.
    pub fn retrieve(&self, query: &str, k: usize) -> PsalmResult<Session> {
        let mut session = self.lock()?;
        require_stage(&session, Stage::Courts, "retrieve")?;

        // Checked here because the mood prefix would make a blank query non-blank.
        if k < 1 {
            return Err(InputError::InvalidK { k }.into());
        }
        if query.trim().is_empty() {
            return Err(InputError::EmptyQuery.into());
        }

        let mood = session.posture.as_ref().map(|p| p.mood).unwrap_or_default();
        let enriched = enrich_query(query, mood);
        let results = Retriever::new(&self.store, self.embedder.as_ref()).retrieve(&enriched, k)?;

        debug!(
            session_id = %session.session_id,
            %mood,
            hits = results.len(),
            "retrieval stored"
        );
        session.last_query = Some(query.trim().to_string());
        session.last_results = Some(results);
        session.touch();
        Ok(session.clone())
    }

    /// Courts only, after a retrieval. Opens the Holy of Holies and asks for
    /// one reflection on the chosen passage.
    ///
    /// A failed reflection still leaves the session in the Holy of Holies;
    /// use [`Journey::retry_reflection`] to ask again.
    pub fn select_unit(&self, unit_id: &str) -> PsalmResult<Session> {
        let mut session = self.lock()?;
        require_stage(&session, Stage::Courts, "select_unit")?;

        let results = session
            .last_results
            .as_ref()
            .ok_or(StageError::NoRetrievalYet)?;
        if !results.contains(unit_id) || self.store.lookup(unit_id).is_none() {
            return Err(StageError::InvalidSelection {
                unit_id: unit_id.to_string(),
            }
            .into());
        }

        session.selected_unit_id = Some(unit_id.to_string());
        session.reflection_text = None;
        advance(&mut session, Stage::HolyOfHolies);

        self.reflect(&mut session)?;
        Ok(session.clone())
    }

    /// Holy of Holies only, while no reflection has been received.
    pub fn retry_reflection(&self) -> PsalmResult<Session> {
        let mut session = self.lock()?;
        if session.stage != Stage::HolyOfHolies || session.reflection_text.is_some() {
            return Err(StageError::StageGuard {
                operation: "retry_reflection",
                stage: session.stage,
            }
            .into());
        }

        self.reflect(&mut session)?;
        Ok(session.clone())
    }

    /// Back to a fresh session at the Gates.
    pub fn restart(&self) -> PsalmResult<Session> {
        let mut session = self.lock()?;
        let fresh = Session::new();
        events::session_restarted(&session.session_id, &fresh.session_id);
        *session = fresh;
        Ok(session.clone())
    }

    pub fn snapshot(&self) -> PsalmResult<Session> {
        Ok(self.lock()?.clone())
    }

    /// Passage text of a unit in the loaded index.
    pub fn passage(&self, unit_id: &str) -> Option<&str> {
        self.store.lookup(unit_id)
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    fn lock(&self) -> PsalmResult<MutexGuard<'_, Session>> {
        match self.session.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(PsalmError::SessionBusy),
            // Fields are only written at commit points, so the state is usable.
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        }
    }

    /// One generator call for the selected unit.
    fn reflect(&self, session: &mut Session) -> PsalmResult<()> {
        let unit_id = session.selected_unit_id.clone().unwrap_or_default();
        let passage = self
            .store
            .lookup(&unit_id)
            .ok_or_else(|| StageError::InvalidSelection {
                unit_id: unit_id.clone(),
            })?;
        let intent = compose_intent(session.posture.as_ref(), session.last_query.as_deref());

        let span = psalm_observability::reflection_span!(unit_id);
        let _guard = span.enter();

        let outcome = self
            .generator
            .generate(passage, &intent)
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(CapabilityError::EmptyReflection.into())
                } else {
                    Ok(text)
                }
            });

        match outcome {
            Ok(text) => {
                session.reflection_text = Some(text);
                session.touch();
                Ok(())
            }
            Err(err) => {
                if let PsalmError::CapabilityError(c) = &err {
                    events::capability_failed(c.capability(), &c.to_string());
                }
                Err(err)
            }
        }
    }
}

fn require_stage(session: &Session, expected: Stage, operation: &'static str) -> PsalmResult<()> {
    if session.stage == expected {
        Ok(())
    } else {
        Err(StageError::StageGuard {
            operation,
            stage: session.stage,
        }
        .into())
    }
}

fn advance(session: &mut Session, to: Stage) {
    let from = session.stage;
    session.stage = to;
    session.touch();
    events::stage_advanced(&session.session_id, from, to);
}
