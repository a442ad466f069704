// One row per signup; signup_seq orders the roster.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityParticipantsRow {
    pub signup_seq: i64,
    pub activity_name: String,
    pub email: String,
}
