use askama::Template;

use crate::models::RosterSnapshot;

/// Stamped by build.rs so a running page shows which binary served it.
pub const BUILD_ID: &str = match option_env!("ROSTER_BUILD_ID") {
    Some(id) => id,
    None => "dev",
};

pub struct ActivityCardView {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub spots_left: u32,
    pub participants: Vec<String>,
}

#[derive(Template)]
#[template(path = "roster.html")]
pub struct RosterTemplate {
    pub activities: Vec<ActivityCardView>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub activities: Vec<ActivityCardView>,
    pub selector_options: Vec<String>,
    pub build_id: &'static str,
}

/// One complete rendering of the roster: the activity list markup plus the
/// options of the activity selector. Always rebuilt from a full snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRoster {
    pub html: String,
    pub selector_options: Vec<String>,
}

pub fn activity_cards(roster: &RosterSnapshot) -> Vec<ActivityCardView> {
    roster
        .iter()
        .map(|(name, view)| ActivityCardView {
            name: name.clone(),
            description: view.description.clone(),
            schedule: view.schedule.clone(),
            max_participants: view.max_participants,
            spots_left: view.spots_left(),
            participants: view.participants.clone(),
        })
        .collect()
}

pub fn render_roster(roster: &RosterSnapshot) -> askama::Result<RenderedRoster> {
    let html = RosterTemplate {
        activities: activity_cards(roster),
    }
    .render()?;
    Ok(RenderedRoster {
        html,
        selector_options: roster.keys().cloned().collect(),
    })
}

pub fn render_index(roster: &RosterSnapshot) -> askama::Result<String> {
    IndexTemplate {
        activities: activity_cards(roster),
        selector_options: roster.keys().cloned().collect(),
        build_id: BUILD_ID,
    }
    .render()
}
