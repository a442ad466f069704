use sqlx::SqliteConnection;

use crate::models::ActivityParticipantsRow;

const SQL_LIST_ALL_PARTICIPANTS: &str = r#"
SELECT
  signup_seq,
  activity_name,
  email
FROM activity_participants
ORDER BY signup_seq ASC
"#;

pub async fn list_all_participants(
    conn: &mut SqliteConnection,
) -> sqlx::Result<Vec<ActivityParticipantsRow>> {
    sqlx::query_as::<_, ActivityParticipantsRow>(SQL_LIST_ALL_PARTICIPANTS)
        .fetch_all(&mut *conn)
        .await
}

const SQL_LIST_PARTICIPANTS: &str = r#"
SELECT
  signup_seq,
  activity_name,
  email
FROM activity_participants
WHERE activity_name = ?
ORDER BY signup_seq ASC
"#;

pub async fn list_participants(
    conn: &mut SqliteConnection,
    activity_name: &str,
) -> sqlx::Result<Vec<ActivityParticipantsRow>> {
    sqlx::query_as::<_, ActivityParticipantsRow>(SQL_LIST_PARTICIPANTS)
        .bind(activity_name)
        .fetch_all(&mut *conn)
        .await
}

const SQL_COUNT_PARTICIPANTS: &str = r#"
SELECT COUNT(*)
FROM activity_participants
WHERE activity_name = ?
"#;

pub async fn count_participants(
    conn: &mut SqliteConnection,
    activity_name: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PARTICIPANTS)
        .bind(activity_name)
        .fetch_one(&mut *conn)
        .await
}

const SQL_PARTICIPANT_EXISTS: &str = r#"
SELECT EXISTS (
  SELECT 1
  FROM activity_participants
  WHERE activity_name = ?
    AND email = ?
)
"#;

pub async fn participant_exists(
    conn: &mut SqliteConnection,
    activity_name: &str,
    email: &str,
) -> sqlx::Result<bool> {
    let found = sqlx::query_scalar::<_, i64>(SQL_PARTICIPANT_EXISTS)
        .bind(activity_name)
        .bind(email)
        .fetch_one(&mut *conn)
        .await?;
    Ok(found != 0)
}

const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO activity_participants (
  activity_name,
  email
) VALUES (?, ?)
"#;

pub async fn insert_participant(
    conn: &mut SqliteConnection,
    activity_name: &str,
    email: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(activity_name)
        .bind(email)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_PARTICIPANT: &str = r#"
DELETE FROM activity_participants
WHERE activity_name = ?
  AND email = ?
"#;

pub async fn delete_participant(
    conn: &mut SqliteConnection,
    activity_name: &str,
    email: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_PARTICIPANT)
        .bind(activity_name)
        .bind(email)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}
