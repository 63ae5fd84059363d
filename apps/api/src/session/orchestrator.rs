//! Session orchestration — sequences the flows into the interview journey:
//! start (generate questions from the cached intake snapshot), the answer
//! loop (one evaluation per question, terminal once scored), advancing, and
//! the final summary.

use redis::Client as RedisClient;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::answer_evaluator::{evaluate_answer, AnswerSubmission, Evaluation};
use crate::flows::jd_parser::DifficultyLevel;
use crate::flows::question_generator::{generate_questions, QuestionRequest, QUESTION_COUNT};
use crate::intake::cache::load_snapshot;
use crate::llm_client::CompletionProvider;
use crate::models::session::{QuestionRow, SessionRow};
use crate::session::scoring::{best_and_worst, overall_score, skill_breakdown, skill_gap, SkillScore};
use crate::session::store;
use crate::session::{STATUS_COMPLETE, STATUS_IN_PROGRESS};

/// A session plus its ordered question sequence.
#[derive(Debug, serde::Serialize)]
pub struct SessionDetail {
    pub session: SessionRow,
    pub questions: Vec<QuestionRow>,
}

/// Result of an advance: either the next question index or completion with
/// the readiness score.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    NextQuestion { question_index: usize },
    Complete { overall_score: u8 },
}

/// The completed-session summary.
#[derive(Debug, serde::Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub overall_score: i16,
    pub best_skill: SkillScore,
    pub worst_skill: SkillScore,
    pub skills: Vec<SkillScore>,
}

/// Starts a session from the cached intake snapshot: computes the skill
/// gaps, generates the question batch, and persists everything atomically.
///
/// A missing snapshot (expired cache, skipped intake) fails before anything
/// is persisted; no partial session is left navigable.
pub async fn start_session(
    pool: &PgPool,
    redis: &RedisClient,
    llm: &dyn CompletionProvider,
    user_id: Uuid,
) -> Result<SessionDetail, AppError> {
    let snapshot = load_snapshot(redis, user_id).await?.ok_or_else(|| {
        AppError::SessionState(
            "Missing resume or job description data. Start again from the upload step."
                .to_string(),
        )
    })?;

    let gaps = skill_gap(&snapshot.job_details.required_skills, &snapshot.resume_skills);
    info!(
        "Starting session for user {}: {} skill gaps against {} required skills",
        user_id,
        gaps.len(),
        snapshot.job_details.required_skills.len()
    );

    let batch = generate_questions(
        llm,
        &QuestionRequest {
            job_description: snapshot.job_description.clone(),
            skill_gaps: gaps,
            difficulty: snapshot.job_details.difficulty_level,
        },
    )
    .await?;

    info!(
        "Generated {} questions (requested {})",
        batch.questions.len(),
        QUESTION_COUNT
    );

    let job_details = serde_json::to_value(&snapshot.job_details)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing job details: {e}")))?;

    let session = store::create_session_with_questions(
        pool,
        user_id,
        &snapshot.job_description,
        job_details,
        &batch.questions,
    )
    .await?;

    let questions = store::fetch_questions(pool, session.id).await?;

    Ok(SessionDetail { session, questions })
}

/// The stored evaluation for a question, if it already has one. A question
/// with feedback is terminal: its evaluation is never overwritten.
pub fn stored_evaluation(question: &QuestionRow) -> Option<Evaluation> {
    match (&question.feedback, question.score) {
        (Some(feedback), Some(score)) => Some(Evaluation {
            score: score.clamp(0, 100) as u8,
            feedback: feedback.clone(),
        }),
        _ => None,
    }
}

/// Evaluates one submitted answer and persists the result on the question.
///
/// Resubmitting an already-evaluated question returns the stored evaluation
/// untouched, without a provider call.
pub async fn submit_answer(
    pool: &PgPool,
    llm: &dyn CompletionProvider,
    session_id: Uuid,
    position: i32,
    answer: String,
) -> Result<Evaluation, AppError> {
    let session = require_session(pool, session_id).await?;
    if session.status != STATUS_IN_PROGRESS {
        return Err(AppError::SessionState(format!(
            "session is {} and no longer accepts answers",
            session.status
        )));
    }

    let question = store::fetch_question(pool, session_id, position)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Question {position} not found in session {session_id}"))
        })?;

    if let Some(existing) = stored_evaluation(&question) {
        return Ok(existing);
    }

    let difficulty = DifficultyLevel::parse(&question.difficulty).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "stored question {} has invalid difficulty '{}'",
            question.id,
            question.difficulty
        ))
    })?;

    let evaluation = evaluate_answer(
        llm,
        &AnswerSubmission {
            question_text: question.question_text.clone(),
            user_answer: answer.clone(),
            skill: question.skill.clone(),
            difficulty,
        },
    )
    .await?;

    store::record_evaluation(
        pool,
        session_id,
        position,
        &answer,
        i16::from(evaluation.score),
        &evaluation.feedback,
    )
    .await?;

    info!(
        "Recorded evaluation for session {} question {}: score {}",
        session_id, position, evaluation.score
    );

    Ok(evaluation)
}

/// Advances past the current question. Only legal once the current question
/// has been evaluated. Past the last question the session completes and the
/// readiness score is persisted.
pub async fn advance(pool: &PgPool, session_id: Uuid) -> Result<AdvanceOutcome, AppError> {
    let session = require_session(pool, session_id).await?;
    if session.status != STATUS_IN_PROGRESS {
        return Err(AppError::SessionState(format!(
            "session is {} and cannot advance",
            session.status
        )));
    }

    let questions = store::fetch_questions(pool, session_id).await?;
    let index = session.current_question_index as usize;
    let current = questions.get(index).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "session {session_id} index {index} is out of range"
        ))
    })?;

    if stored_evaluation(current).is_none() {
        return Err(AppError::SessionState(
            "Answer the current question before advancing".to_string(),
        ));
    }

    if index + 1 < questions.len() {
        store::advance_session(pool, session_id, (index + 1) as i32).await?;
        return Ok(AdvanceOutcome::NextQuestion {
            question_index: index + 1,
        });
    }

    let scores: Vec<u8> = questions
        .iter()
        .filter_map(|q| q.score.map(|s| s.clamp(0, 100) as u8))
        .collect();
    let score = overall_score(&scores).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("session {session_id} has no scores to average"))
    })?;

    store::complete_session(pool, session_id, i16::from(score)).await?;
    info!("Session {} complete with overall score {}", session_id, score);

    Ok(AdvanceOutcome::Complete {
        overall_score: score,
    })
}

/// Builds the summary for a completed session: readiness score plus the
/// per-skill breakdown with best and worst skills.
pub async fn summary(pool: &PgPool, session_id: Uuid) -> Result<SessionSummary, AppError> {
    let session = require_session(pool, session_id).await?;
    if session.status != STATUS_COMPLETE {
        return Err(AppError::SessionState(
            "Session is not complete yet".to_string(),
        ));
    }

    let overall = session.overall_score.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "complete session {session_id} is missing its overall score"
        ))
    })?;

    let questions = store::fetch_questions(pool, session_id).await?;
    let pairs: Vec<(String, u8)> = questions
        .iter()
        .filter_map(|q| q.score.map(|s| (q.skill.clone(), s.clamp(0, 100) as u8)))
        .collect();

    let skills = skill_breakdown(&pairs);
    let (best, worst) = best_and_worst(&skills).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "complete session {session_id} has no scored questions"
        ))
    })?;

    Ok(SessionSummary {
        session_id,
        overall_score: overall,
        best_skill: best.clone(),
        worst_skill: worst.clone(),
        skills: skills.clone(),
    })
}

async fn require_session(pool: &PgPool, session_id: Uuid) -> Result<SessionRow, AppError> {
    store::fetch_session(pool, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::session::{QUESTION_ANSWERED, QUESTION_UNANSWERED};

    use super::*;

    fn question_fixture(score: Option<i16>, feedback: Option<&str>) -> QuestionRow {
        QuestionRow {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            position: 0,
            question_text: "Explain joins.".to_string(),
            skill: "SQL".to_string(),
            difficulty: "medium".to_string(),
            question_type: "technical".to_string(),
            status: if feedback.is_some() {
                QUESTION_ANSWERED.to_string()
            } else {
                QUESTION_UNANSWERED.to_string()
            },
            user_answer: feedback.map(|_| "An answer".to_string()),
            score,
            feedback: feedback.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unanswered_question_has_no_stored_evaluation() {
        let question = question_fixture(None, None);
        assert!(stored_evaluation(&question).is_none());
    }

    #[test]
    fn test_answered_question_returns_stored_evaluation() {
        let question = question_fixture(Some(85), Some("Solid answer."));
        let evaluation = stored_evaluation(&question).unwrap();
        assert_eq!(evaluation.score, 85);
        assert_eq!(evaluation.feedback, "Solid answer.");
    }

    #[test]
    fn test_stored_evaluation_requires_both_fields() {
        // A score without feedback (or vice versa) is not a terminal state.
        assert!(stored_evaluation(&question_fixture(Some(50), None)).is_none());
        assert!(stored_evaluation(&question_fixture(None, Some("Feedback"))).is_none());
    }

    #[test]
    fn test_advance_outcome_serializes_with_state_tag() {
        let outcome = AdvanceOutcome::Complete { overall_score: 80 };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["state"], "complete");
        assert_eq!(value["overall_score"], 80);
    }
}
