use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Posture, RetrievalResult};

/// Journey stage. Strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Gates,
    Courts,
    HolyOfHolies,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Gates => f.write_str("Gates"),
            Stage::Courts => f.write_str("Courts"),
            Stage::HolyOfHolies => f.write_str("Holy of Holies"),
        }
    }
}

/// Per-user interaction state. Mutated only by the journey state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub stage: Stage,
    pub posture_confirmed: bool,
    pub posture: Option<Posture>,
    /// Query text of the most recent retrieval, before any mood prefix.
    pub last_query: Option<String>,
    /// Most recent retrieval in this session.
    pub last_results: Option<RetrievalResult>,
    pub selected_unit_id: Option<String>,
    pub reflection_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            stage: Stage::Gates,
            posture_confirmed: false,
            posture: None,
            last_query: None,
            last_results: None,
            selected_unit_id: None,
            reflection_text: None,
            created_at: now,
            last_activity: now,
        }
    }

    /// True once the reflection has been received.
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::HolyOfHolies && self.reflection_text.is_some()
    }

    /// Compare journey state, ignoring identity and timestamps.
    pub fn same_progress(&self, other: &Session) -> bool {
        self.stage == other.stage
            && self.posture_confirmed == other.posture_confirmed
            && self.posture == other.posture
            && self.last_query == other.last_query
            && self.last_results == other.last_results
            && self.selected_unit_id == other.selected_unit_id
            && self.reflection_text == other.reflection_text
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
