use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{
    activities_repo, activity_participants_repo, activity_signup_commands_repo, connect, schema,
};
use crate::error::{BootstrapError, RosterError};
use crate::models::{ActivitiesRow, Activity, ActivityView, RosterSnapshot};
use crate::services::seed_service;

pub const ACTION_SIGNUP: &str = "signup";
pub const ACTION_UNREGISTER: &str = "unregister";

/// Owner of every activity record.
///
/// Cloning yields another handle to the same roster. Mutations are
/// serialized by one write lock and each runs in a single transaction, so
/// the capacity check and the insert can never interleave with another
/// signup. Reads run in their own transaction and see a consistent roster.
#[derive(Clone)]
pub struct RosterStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl RosterStore {
    pub async fn open(database_url: &str, seed: &RosterSnapshot) -> Result<Self, BootstrapError> {
        let pool = connect(database_url).await?;
        Self::from_pool(pool, seed).await
    }

    /// Creates the schema if needed and loads `seed`. Activities that already
    /// exist keep their stored participants.
    pub async fn from_pool(pool: SqlitePool, seed: &RosterSnapshot) -> Result<Self, BootstrapError> {
        seed_service::validate_seed(seed)?;

        {
            let mut conn = pool.acquire().await?;
            schema::ensure_schema(&mut conn).await?;
        }

        let store = Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };
        let created = store.apply_seed(seed).await?;
        info!(activities = seed.len(), created, "roster store ready");
        Ok(store)
    }

    async fn apply_seed(&self, seed: &RosterSnapshot) -> sqlx::Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut created = 0;
        for (order, (name, view)) in seed.iter().enumerate() {
            let inserted = activities_repo::insert_activity_if_absent(
                &mut tx,
                activities_repo::NewActivity {
                    name,
                    description: &view.description,
                    schedule: &view.schedule,
                    max_participants: i64::from(view.max_participants),
                    seed_order: order as i64,
                },
            )
            .await?;
            if inserted == 0 {
                debug!(activity = %name, "activity already stored, keeping its roster");
                continue;
            }
            for email in &view.participants {
                activity_participants_repo::insert_participant(&mut tx, name, email).await?;
            }
            created += 1;
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn list_activities(&self) -> Result<RosterSnapshot, RosterError> {
        let mut tx = self.pool.begin().await?;
        let activities = activities_repo::list_activities(&mut tx).await?;
        let participants = activity_participants_repo::list_all_participants(&mut tx).await?;
        tx.commit().await?;

        let mut roster: RosterSnapshot = activities
            .into_iter()
            .map(|row| {
                let view = empty_view(&row);
                (row.name, view)
            })
            .collect();
        for p in participants {
            if let Some(view) = roster.get_mut(&p.activity_name) {
                view.participants.push(p.email);
            }
        }
        Ok(roster)
    }

    pub async fn get_activity(&self, name: &str) -> Result<Activity, RosterError> {
        let mut tx = self.pool.begin().await?;
        let row = activities_repo::load_activity(&mut tx, name)
            .await?
            .ok_or(RosterError::ActivityNotFound)?;
        let participants = activity_participants_repo::list_participants(&mut tx, name).await?;
        tx.commit().await?;

        let mut view = empty_view(&row);
        view.participants = participants.into_iter().map(|p| p.email).collect();
        Ok(Activity {
            name: row.name,
            view,
        })
    }

    /// Appends `email` to the activity unless it is already listed or the
    /// activity is at capacity.
    pub async fn add_participant(&self, name: &str, email: &str) -> Result<(), RosterError> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let activity = activities_repo::load_activity(&mut tx, name)
            .await?
            .ok_or(RosterError::ActivityNotFound)?;
        if activity_participants_repo::participant_exists(&mut tx, name, email).await? {
            return Err(RosterError::DuplicateParticipant);
        }
        let count = activity_participants_repo::count_participants(&mut tx, name).await?;
        if count >= activity.max_participants {
            return Err(RosterError::Full);
        }

        activity_participants_repo::insert_participant(&mut tx, name, email).await?;
        record_command(&mut tx, name, email, ACTION_SIGNUP).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn remove_participant(&self, name: &str, email: &str) -> Result<(), RosterError> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        if activities_repo::load_activity(&mut tx, name).await?.is_none() {
            return Err(RosterError::ActivityNotFound);
        }
        let removed = activity_participants_repo::delete_participant(&mut tx, name, email).await?;
        if removed == 0 {
            return Err(RosterError::ParticipantNotFound);
        }

        record_command(&mut tx, name, email, ACTION_UNREGISTER).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Number of applied commands of `action` recorded for an activity.
    pub async fn command_count(&self, name: &str, action: &str) -> Result<i64, RosterError> {
        let mut conn = self.pool.acquire().await?;
        Ok(activity_signup_commands_repo::count_signup_commands(&mut conn, name, action).await?)
    }
}

fn empty_view(row: &ActivitiesRow) -> ActivityView {
    ActivityView {
        description: row.description.clone(),
        schedule: row.schedule.clone(),
        max_participants: u32::try_from(row.max_participants.max(0)).unwrap_or(u32::MAX),
        participants: Vec::new(),
    }
}

async fn record_command(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    action: &str,
) -> sqlx::Result<()> {
    let id = Uuid::new_v4().to_string();
    activity_signup_commands_repo::insert_signup_command(
        conn,
        activity_signup_commands_repo::NewActivitySignupCommand {
            id: &id,
            activity_name: name,
            email,
            action,
            note: Some("roster"),
        },
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed_service::default_seed;

    fn activity(max: u32, participants: &[&str]) -> ActivityView {
        ActivityView {
            description: "Learn strategies and compete in chess tournaments".to_string(),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: max,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    async fn store_with(entries: &[(&str, ActivityView)]) -> RosterStore {
        let seed: RosterSnapshot = entries
            .iter()
            .map(|(name, view)| (name.to_string(), view.clone()))
            .collect();
        RosterStore::open("sqlite::memory:", &seed).await.unwrap()
    }

    #[tokio::test]
    async fn lists_default_seed_in_catalog_order() {
        let store = RosterStore::open("sqlite::memory:", &default_seed())
            .await
            .unwrap();
        let roster = store.list_activities().await.unwrap();

        assert_eq!(
            roster.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Chess Club", "Programming Class", "Gym Class"]
        );
        let chess = &roster["Chess Club"];
        assert_eq!(chess.max_participants, 12);
        assert_eq!(
            chess.participants,
            vec!["michael@mergington.edu", "daniel@mergington.edu"]
        );
        assert_eq!(chess.spots_left(), 10);
    }

    #[tokio::test]
    async fn fills_to_capacity_then_reports_full() {
        let store = store_with(&[("Chess Club", activity(3, &[]))]).await;
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            store.add_participant("Chess Club", email).await.unwrap();
        }

        let err = store
            .add_participant("Chess Club", "d@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Full));

        let chess = store.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants.len(), 3);
        assert_eq!(chess.spots_left(), 0);
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected_and_roster_unchanged() {
        let store = store_with(&[("Chess Club", activity(5, &["a@x.com"]))]).await;
        let err = store
            .add_participant("Chess Club", "a@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateParticipant));

        let chess = store.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants, vec!["a@x.com"]);
    }

    #[tokio::test]
    async fn duplicate_wins_over_full() {
        let store = store_with(&[("Chess Club", activity(1, &["a@x.com"]))]).await;
        let err = store
            .add_participant("Chess Club", "a@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateParticipant));
    }

    #[tokio::test]
    async fn unknown_activity_is_not_found() {
        let store = store_with(&[("Chess Club", activity(5, &[]))]).await;
        assert!(matches!(
            store.add_participant("chess club", "a@x.com").await,
            Err(RosterError::ActivityNotFound)
        ));
        assert!(matches!(
            store.remove_participant("Nope", "a@x.com").await,
            Err(RosterError::ActivityNotFound)
        ));
        assert!(matches!(
            store.get_activity("Nope").await,
            Err(RosterError::ActivityNotFound)
        ));
    }

    #[tokio::test]
    async fn removing_absent_participant_is_not_found() {
        let store = store_with(&[("Chess Club", activity(5, &["a@x.com"]))]).await;
        let err = store
            .remove_participant("Chess Club", "b@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::ParticipantNotFound));

        let chess = store.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants, vec!["a@x.com"]);
    }

    #[tokio::test]
    async fn resignup_after_removal_goes_to_the_end() {
        let store = store_with(&[("Chess Club", activity(5, &["a@x.com", "b@x.com"]))]).await;
        store.remove_participant("Chess Club", "a@x.com").await.unwrap();
        store.add_participant("Chess Club", "a@x.com").await.unwrap();

        let chess = store.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants, vec!["b@x.com", "a@x.com"]);
    }

    /// Races `tasks` signups for the last open spot of a two-seat activity.
    async fn race_for_last_spot(store: &RosterStore, tasks: usize) {
        let mut handles = Vec::new();
        for i in 0..tasks {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add_participant("Chess Club", &format!("student{}@x.com", i))
                    .await
            }));
        }

        let mut ok = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(RosterError::Full) => full += 1,
                Err(other) => panic!("unexpected outcome: {other}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(full, tasks - 1);

        let roster = store.list_activities().await.unwrap();
        assert_eq!(roster["Chess Club"].participants.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_signups_never_overcommit() {
        let store = store_with(&[("Chess Club", activity(2, &["a@x.com"]))]).await;
        race_for_last_spot(&store, 16).await;
    }

    // A file database gets a multi-connection pool, so only the write lock
    // keeps the capacity check and the insert together.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_signups_on_file_database_never_overcommit() {
        let path = std::env::temp_dir().join(format!("roster-race-{}.db", Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let seed: RosterSnapshot = [("Chess Club".to_string(), activity(2, &["a@x.com"]))]
            .into_iter()
            .collect();

        let store = RosterStore::open(&url, &seed).await.unwrap();
        race_for_last_spot(&store, 32).await;

        store.pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn separate_memory_stores_do_not_share_state() {
        let first = RosterStore::open("sqlite::memory:", &default_seed())
            .await
            .unwrap();
        let second = RosterStore::open("sqlite::memory:", &default_seed())
            .await
            .unwrap();

        first
            .add_participant("Chess Club", "isolation@test.com")
            .await
            .unwrap();

        let roster = second.list_activities().await.unwrap();
        assert!(!roster["Chess Club"]
            .participants
            .contains(&"isolation@test.com".to_string()));
        assert_eq!(roster["Chess Club"].participants.len(), 2);
    }

    #[tokio::test]
    async fn reseeding_keeps_stored_participants() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let store = RosterStore::from_pool(pool.clone(), &default_seed())
            .await
            .unwrap();
        store
            .remove_participant("Chess Club", "michael@mergington.edu")
            .await
            .unwrap();

        let reopened = RosterStore::from_pool(pool, &default_seed()).await.unwrap();
        let chess = reopened.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants, vec!["daniel@mergington.edu"]);
    }

    #[tokio::test]
    async fn applied_mutations_are_logged() {
        let store = store_with(&[("Chess Club", activity(5, &[]))]).await;
        store.add_participant("Chess Club", "a@x.com").await.unwrap();
        store.add_participant("Chess Club", "a@x.com").await.unwrap_err();
        store.remove_participant("Chess Club", "a@x.com").await.unwrap();

        assert_eq!(
            store.command_count("Chess Club", ACTION_SIGNUP).await.unwrap(),
            1
        );
        assert_eq!(
            store
                .command_count("Chess Club", ACTION_UNREGISTER)
                .await
                .unwrap(),
            1
        );
    }
}
