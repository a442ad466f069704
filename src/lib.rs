//! Activity roster: a fixed catalog of activities that students sign up for
//! by email, with per-activity capacity limits.
//!
//! [`database::RosterStore`] owns the roster, [`services::signup_service`]
//! turns requests into store transitions, [`web::build_router`] exposes them
//! over HTTP and [`client::SyncSession`] keeps a client rendering in sync.

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod web;

pub use database::RosterStore;
pub use error::{BootstrapError, RosterError};
