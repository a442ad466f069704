use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::database::RosterStore;
use crate::error::RosterError;
use crate::models::{EmailQuery, MessageResponse, RosterSnapshot};
use crate::services::signup_service;

pub async fn list_activities_handler(
    State(store): State<RosterStore>,
) -> Result<Json<RosterSnapshot>, RosterError> {
    Ok(Json(store.list_activities().await?))
}

pub async fn signup_handler(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
    State(store): State<RosterStore>,
) -> Result<Json<MessageResponse>, RosterError> {
    let Path(activity_name) = path?;
    let Query(query) = query?;
    let receipt = signup_service::signup(&store, &activity_name, &query.email).await?;
    Ok(Json(MessageResponse {
        message: receipt.message,
    }))
}

pub async fn unregister_handler(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
    State(store): State<RosterStore>,
) -> Result<Json<MessageResponse>, RosterError> {
    let Path(activity_name) = path?;
    let Query(query) = query?;
    let receipt = signup_service::unregister(&store, &activity_name, &query.email).await?;
    Ok(Json(MessageResponse {
        message: receipt.message,
    }))
}
