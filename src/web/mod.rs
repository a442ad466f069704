pub mod routes;

use std::path::Path;

use axum::{
    routing::{delete, get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::database::RosterStore;
use routes::{activities, pages};

pub fn build_router(store: RosterStore, assets_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(pages::index_handler))
        .route("/activities", get(activities::list_activities_handler))
        .route(
            "/activities/:activity_name/signup",
            post(activities::signup_handler),
        )
        .route(
            "/activities/:activity_name/unregister",
            delete(activities::unregister_handler),
        )
        // Static files
        .nest_service("/static", ServeDir::new(assets_dir.as_ref()))
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(store)
}
