use sqlx::SqliteConnection;

const SQL_INSERT_SIGNUP_COMMAND: &str = r#"
INSERT INTO activity_signup_commands (
  id,
  activity_name,
  email,
  action,
  note
) VALUES (?, ?, ?, ?, ?)
"#;

pub struct NewActivitySignupCommand<'a> {
    pub id: &'a str,
    pub activity_name: &'a str,
    pub email: &'a str,
    pub action: &'a str, // signup|unregister
    pub note: Option<&'a str>,
}

pub async fn insert_signup_command(
    conn: &mut SqliteConnection,
    cmd: NewActivitySignupCommand<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_SIGNUP_COMMAND)
        .bind(cmd.id)
        .bind(cmd.activity_name)
        .bind(cmd.email)
        .bind(cmd.action)
        .bind(cmd.note)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT_SIGNUP_COMMANDS: &str = r#"
SELECT COUNT(*)
FROM activity_signup_commands
WHERE activity_name = ?
  AND action = ?
"#;

pub async fn count_signup_commands(
    conn: &mut SqliteConnection,
    activity_name: &str,
    action: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_SIGNUP_COMMANDS)
        .bind(activity_name)
        .bind(action)
        .fetch_one(&mut *conn)
        .await
}
