//! Intent text handed to the reflection generator.

use psalm_core::models::Posture;

/// What the reflection should feel like, regardless of posture.
pub const REFLECTIVE_INTENT: &str =
    "Now write a guided reflection that feels like entering God's courts: thanksgiving, awe, and nearness.";

/// Posture text when given, otherwise the seeker's last query.
pub fn compose_intent(posture: Option<&Posture>, last_query: Option<&str>) -> String {
    let declared = posture
        .map(|p| p.text.trim())
        .filter(|t| !t.is_empty())
        .or_else(|| last_query.map(str::trim).filter(|t| !t.is_empty()));

    match declared {
        Some(text) => format!("User posture:\n{text}\n\n{REFLECTIVE_INTENT}"),
        None => REFLECTIVE_INTENT.to_string(),
    }
}
