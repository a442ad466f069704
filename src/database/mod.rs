pub mod activities_repo;
pub mod activity_participants_repo;
pub mod activity_signup_commands_repo;
pub mod roster_store;
pub mod schema;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use roster_store::RosterStore;

/// Opens the SQLite pool behind the roster.
///
/// An in-memory database only exists while its connection does, so memory
/// URLs get exactly one connection that never idles out.
pub async fn connect(database_url: &str) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool = SqlitePoolOptions::new();
    if is_in_memory(database_url) {
        pool = pool
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    pool.connect_with(options).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
