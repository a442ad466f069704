use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Full roster keyed by activity name, in catalog order.
///
/// This is the `GET /activities` wire shape and the seed file format.
pub type RosterSnapshot = IndexMap<String, ActivityView>;

/// One activity as the roster exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Emails in signup order.
    #[serde(default)]
    pub participants: Vec<String>,
}

impl ActivityView {
    pub fn participant_count(&self) -> u32 {
        u32::try_from(self.participants.len()).unwrap_or(u32::MAX)
    }

    pub fn spots_left(&self) -> u32 {
        self.max_participants
            .saturating_sub(self.participant_count())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub view: ActivityView,
}

impl Activity {
    pub fn spots_left(&self) -> u32 {
        self.view.spots_left()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// `?email=` on the mutation routes. A missing parameter reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}
