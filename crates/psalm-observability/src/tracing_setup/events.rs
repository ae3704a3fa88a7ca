//! Structured log events for key lifecycle points.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use psalm_core::errors::Capability;
use psalm_core::models::Stage;

/// Log a published index.
pub fn index_built(path: &str, units: usize, dimensionality: usize, model: &str) {
    tracing::info!(
        event = "index_built",
        path = %path,
        units = units,
        dimensionality = dimensionality,
        model = %model,
        "index built"
    );
}

/// Log a successful index load.
pub fn index_loaded(path: &str, units: usize, model: &str) {
    tracing::info!(
        event = "index_loaded",
        path = %path,
        units = units,
        model = %model,
        "index loaded"
    );
}

/// Log a corpus that no longer matches the index checksum.
pub fn index_stale(path: &str, indexed: &str, current: &str) {
    tracing::warn!(
        event = "index_stale",
        path = %path,
        indexed = %indexed,
        current = %current,
        "index checksum does not match the current corpus"
    );
}

/// Log embedding progress during a build.
pub fn build_progress(embedded: usize, total: usize) {
    tracing::info!(
        event = "build_progress",
        embedded = embedded,
        total = total,
        "embedding progress"
    );
}

/// Log a journey transition.
pub fn stage_advanced(session_id: &str, from: Stage, to: Stage) {
    tracing::info!(
        event = "stage_advanced",
        session_id = %session_id,
        from = %from,
        to = %to,
        "stage advanced"
    );
}

/// Log a failed capability call.
pub fn capability_failed(capability: Capability, reason: &str) {
    tracing::warn!(
        event = "capability_failed",
        capability = %capability,
        reason = %reason,
        "capability failed"
    );
}

/// Log a session reset.
pub fn session_restarted(old_session_id: &str, new_session_id: &str) {
    tracing::info!(
        event = "session_restarted",
        old_session_id = %old_session_id,
        new_session_id = %new_session_id,
        "session restarted"
    );
}
