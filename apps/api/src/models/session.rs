use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One end-to-end mock-interview attempt. `job_details` holds the
/// ParsedJobDescription snapshot taken at intake time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_description_text: String,
    pub job_details: Value,
    pub status: String,
    pub current_question_index: i32,
    pub overall_score: Option<i16>,
    pub created_at: DateTime<Utc>,
}

/// One question in a session's ordered sequence. `position` is insertion
/// order and never changes; answer fields are filled in exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub position: i32,
    pub question_text: String,
    pub skill: String,
    pub difficulty: String,
    pub question_type: String,
    pub status: String,
    pub user_answer: Option<String>,
    pub score: Option<i16>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}
