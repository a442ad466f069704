use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

use crate::database::RosterStore;
use crate::render;

pub async fn index_handler(State(store): State<RosterStore>) -> Response {
    let roster = match store.list_activities().await {
        Ok(roster) => roster,
        Err(e) => {
            warn!("Roster page load failed: {}", e);
            return e.into_response();
        }
    };

    match render::render_index(&roster) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("Roster page render failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
