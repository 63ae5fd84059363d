//! Axum route handlers for the intake step.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::jd_parser::{parse_job_description, JobPosting, ParsedJobDescription};
use crate::flows::resume_parser::{parse_resume, ParsedResume, ResumeUpload};
use crate::intake::cache::{store_snapshot, IntakeSnapshot};
use crate::session::scoring::skill_gap;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
    pub resume_data_uri: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resume: ParsedResume,
    pub job: ParsedJobDescription,
    pub skill_gaps: Vec<String>,
}

/// POST /api/v1/intake/analyze
///
/// Parses the uploaded resume and the job description in one step (both
/// provider calls run concurrently and both must succeed), then caches the
/// snapshot for session start and returns a skill-gap preview.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let upload = ResumeUpload {
        resume_data_uri: request.resume_data_uri,
    };
    let posting = JobPosting {
        jd_text: request.job_description.clone(),
    };

    // Join semantics: either failure aborts intake and nothing is cached.
    let (resume, job) = tokio::try_join!(
        parse_resume(state.llm.as_ref(), &upload),
        parse_job_description(state.llm.as_ref(), &posting),
    )?;

    let skill_gaps = skill_gap(&job.required_skills, &resume.skills);
    info!(
        "Intake for user {}: {} required skills, {} gaps",
        request.user_id,
        job.required_skills.len(),
        skill_gaps.len()
    );

    store_snapshot(
        &state.redis,
        request.user_id,
        &IntakeSnapshot {
            resume_skills: resume.skills.clone(),
            job_details: job.clone(),
            job_description: request.job_description,
        },
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        resume,
        job,
        skill_gaps,
    }))
}
