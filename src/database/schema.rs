use sqlx::SqliteConnection;

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS activities (
  name TEXT PRIMARY KEY NOT NULL,
  description TEXT NOT NULL,
  schedule TEXT NOT NULL,
  max_participants INTEGER NOT NULL CHECK (max_participants > 0),
  seed_order INTEGER NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS activity_participants (
  signup_seq INTEGER PRIMARY KEY AUTOINCREMENT,
  activity_name TEXT NOT NULL REFERENCES activities (name),
  email TEXT NOT NULL,
  UNIQUE (activity_name, email)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS activity_signup_commands (
  id TEXT PRIMARY KEY NOT NULL,
  activity_name TEXT NOT NULL,
  email TEXT NOT NULL,
  action TEXT NOT NULL CHECK (action IN ('signup', 'unregister')),
  note TEXT,
  created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
"#,
];

pub async fn ensure_schema(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}
