use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::BootstrapError;
use crate::models::{ActivityView, RosterSnapshot};

/// The built-in activity catalog.
pub fn default_seed() -> RosterSnapshot {
    let mut roster = RosterSnapshot::new();
    roster.insert(
        "Chess Club".to_string(),
        seed_activity(
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
    );
    roster.insert(
        "Programming Class".to_string(),
        seed_activity(
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
    );
    roster.insert(
        "Gym Class".to_string(),
        seed_activity(
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
    );
    roster
}

fn seed_activity(
    description: &str,
    schedule: &str,
    max_participants: u32,
    participants: &[&str],
) -> ActivityView {
    ActivityView {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// Reads a catalog in the `GET /activities` format.
pub fn load_seed_file(path: &Path) -> Result<RosterSnapshot, BootstrapError> {
    let bytes = fs::read(path).map_err(|source| BootstrapError::SeedIo {
        path: path.to_path_buf(),
        source,
    })?;
    let roster: RosterSnapshot =
        serde_json::from_slice(&bytes).map_err(|source| BootstrapError::SeedParse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_seed(&roster)?;
    Ok(roster)
}

/// A seed has to satisfy the same invariants the store enforces at runtime.
pub fn validate_seed(roster: &RosterSnapshot) -> Result<(), BootstrapError> {
    for (name, view) in roster {
        let invalid = |reason: String| BootstrapError::InvalidSeed {
            name: name.clone(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("activity name is empty".to_string()));
        }
        if view.max_participants == 0 {
            return Err(invalid("max_participants must be positive".to_string()));
        }
        if view.participants.len() > view.max_participants as usize {
            return Err(invalid(format!(
                "{} participants exceed capacity {}",
                view.participants.len(),
                view.max_participants
            )));
        }
        let mut seen = HashSet::new();
        for email in &view.participants {
            if !seen.insert(email.as_str()) {
                return Err(invalid(format!("participant {} is listed twice", email)));
            }
        }
    }
    Ok(())
}
