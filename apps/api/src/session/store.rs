//! Durable session store — all reads and writes for `sessions` and
//! `session_questions`. The initial question batch is written inside one
//! transaction so a session is never left partially created.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::flows::question_generator::GeneratedQuestion;
use crate::models::session::{QuestionRow, SessionRow};
use crate::session::{QUESTION_ANSWERED, QUESTION_UNANSWERED, STATUS_COMPLETE, STATUS_IN_PROGRESS};

/// Creates the session row and its full question batch atomically.
pub async fn create_session_with_questions(
    pool: &PgPool,
    user_id: Uuid,
    job_description_text: &str,
    job_details: Value,
    questions: &[GeneratedQuestion],
) -> Result<SessionRow, sqlx::Error> {
    let session_id = Uuid::new_v4();

    let mut tx = pool.begin().await?;

    let session = sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO sessions
            (id, user_id, job_description_text, job_details, status, current_question_index)
        VALUES ($1, $2, $3, $4, $5, 0)
        RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(job_description_text)
    .bind(&job_details)
    .bind(STATUS_IN_PROGRESS)
    .fetch_one(&mut *tx)
    .await?;

    for (position, question) in questions.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO session_questions
                (id, session_id, position, question_text, skill, difficulty, question_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(position as i32)
        .bind(&question.question_text)
        .bind(&question.skill)
        .bind(question.difficulty.as_str())
        .bind(question.question_type.as_str())
        .bind(QUESTION_UNANSWERED)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        "Created session {} with {} questions for user {}",
        session_id,
        questions.len(),
        user_id
    );

    Ok(session)
}

pub async fn fetch_session(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = $1")
        .bind(session_id)
        .fetch_optional(pool)
        .await
}

/// The session's question sequence in presentation order.
pub async fn fetch_questions(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<QuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRow>(
        "SELECT * FROM session_questions WHERE session_id = $1 ORDER BY position",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_question(
    pool: &PgPool,
    session_id: Uuid,
    position: i32,
) -> Result<Option<QuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRow>(
        "SELECT * FROM session_questions WHERE session_id = $1 AND position = $2",
    )
    .bind(session_id)
    .bind(position)
    .fetch_optional(pool)
    .await
}

/// Attaches the answer and its evaluation to one question and marks it
/// answered. Called at most once per question.
pub async fn record_evaluation(
    pool: &PgPool,
    session_id: Uuid,
    position: i32,
    user_answer: &str,
    score: i16,
    feedback: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE session_questions
        SET user_answer = $3, score = $4, feedback = $5, status = $6
        WHERE session_id = $1 AND position = $2
        "#,
    )
    .bind(session_id)
    .bind(position)
    .bind(user_answer)
    .bind(score)
    .bind(feedback)
    .bind(QUESTION_ANSWERED)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn advance_session(
    pool: &PgPool,
    session_id: Uuid,
    next_index: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET current_question_index = $2 WHERE id = $1")
        .bind(session_id)
        .bind(next_index)
        .execute(pool)
        .await?;

    Ok(())
}

/// Marks the session complete with its readiness score. The session is not
/// mutated again after this.
pub async fn complete_session(
    pool: &PgPool,
    session_id: Uuid,
    overall_score: i16,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET status = $2, overall_score = $3 WHERE id = $1")
        .bind(session_id)
        .bind(STATUS_COMPLETE)
        .bind(overall_score)
        .execute(pool)
        .await?;

    Ok(())
}

/// A user's sessions, newest first.
pub async fn list_sessions(pool: &PgPool, user_id: Uuid) -> Result<Vec<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(
        "SELECT * FROM sessions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
