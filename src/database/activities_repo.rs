use sqlx::SqliteConnection;

use crate::models::ActivitiesRow;

const SQL_LIST_ACTIVITIES: &str = r#"
SELECT
  name,
  description,
  schedule,
  max_participants,
  seed_order
FROM activities
ORDER BY seed_order ASC, name ASC
"#;

pub async fn list_activities(conn: &mut SqliteConnection) -> sqlx::Result<Vec<ActivitiesRow>> {
    sqlx::query_as::<_, ActivitiesRow>(SQL_LIST_ACTIVITIES)
        .fetch_all(&mut *conn)
        .await
}

const SQL_LOAD_ACTIVITY: &str = r#"
SELECT
  name,
  description,
  schedule,
  max_participants,
  seed_order
FROM activities
WHERE name = ?
"#;

pub async fn load_activity(
    conn: &mut SqliteConnection,
    name: &str,
) -> sqlx::Result<Option<ActivitiesRow>> {
    sqlx::query_as::<_, ActivitiesRow>(SQL_LOAD_ACTIVITY)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}

const SQL_INSERT_ACTIVITY_IF_ABSENT: &str = r#"
INSERT OR IGNORE INTO activities (
  name,
  description,
  schedule,
  max_participants,
  seed_order
) VALUES (?, ?, ?, ?, ?)
"#;

pub struct NewActivity<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub max_participants: i64,
    pub seed_order: i64,
}

/// Returns 0 when an activity with that name already exists.
pub async fn insert_activity_if_absent(
    conn: &mut SqliteConnection,
    activity: NewActivity<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ACTIVITY_IF_ABSENT)
        .bind(activity.name)
        .bind(activity.description)
        .bind(activity.schedule)
        .bind(activity.max_participants)
        .bind(activity.seed_order)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}
