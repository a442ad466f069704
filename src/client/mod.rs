//! Client side of the roster: an HTTP client for the three roster operations
//! and a sync session that keeps a local rendering consistent with the server.

pub mod api;
pub mod sync;

pub use api::{ClientError, RosterClient};
pub use sync::{
    FormState, MessageKind, MutationOutcome, RosterView, StatusMessage, SyncSession,
    UnregisterConfirmation,
};
