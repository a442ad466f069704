use std::path::PathBuf;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Outcome of a roster operation that did not apply.
///
/// The `Display` text is the human-readable detail returned to clients.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student is not signed up for this activity")]
    ParticipantNotFound,
    #[error("Activity is full")]
    Full,
    #[error("Student is already signed up for this activity")]
    DuplicateParticipant,
    #[error("{0}")]
    MalformedInput(String),
    #[error("roster storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl RosterError {
    pub fn status(&self) -> StatusCode {
        match self {
            RosterError::ActivityNotFound => StatusCode::NOT_FOUND,
            RosterError::ParticipantNotFound
            | RosterError::Full
            | RosterError::DuplicateParticipant => StatusCode::BAD_REQUEST,
            RosterError::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RosterError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Detail safe to hand to a client. Storage causes stay in the log.
    pub fn detail(&self) -> String {
        match self {
            RosterError::Storage(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        if let RosterError::Storage(e) = &self {
            error!("roster storage failure: {}", e);
        }
        let body = ErrorResponse {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<PathRejection> for RosterError {
    fn from(rejection: PathRejection) -> Self {
        RosterError::MalformedInput(rejection.body_text())
    }
}

impl From<QueryRejection> for RosterError {
    fn from(rejection: QueryRejection) -> Self {
        RosterError::MalformedInput(rejection.body_text())
    }
}

/// Failure while opening the store or loading the activity catalog.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot read seed file {path}: {source}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file {path} is not a valid roster: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seed activity '{name}': {reason}")]
    InvalidSeed { name: String, reason: String },
    #[error("roster storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
