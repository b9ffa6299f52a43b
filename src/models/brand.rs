use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, FromRow)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}
