//! Transient intake cache — carries the parsed resume skills, job details,
//! and raw job description between the intake step and session start.
//!
//! Values are JSON-serialized under fixed per-user keys. The TTL stands in
//! for browser session storage: snapshots expire instead of persisting.

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::jd_parser::ParsedJobDescription;

const INTAKE_TTL_SECS: u64 = 3600;

fn resume_skills_key(user_id: Uuid) -> String {
    format!("intake:{user_id}:resume_skills")
}

fn job_details_key(user_id: Uuid) -> String {
    format!("intake:{user_id}:job_details")
}

fn job_description_key(user_id: Uuid) -> String {
    format!("intake:{user_id}:job_description")
}

/// Everything session start needs from the intake step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSnapshot {
    pub resume_skills: Vec<String>,
    pub job_details: ParsedJobDescription,
    pub job_description: String,
}

/// Writes the snapshot under the three intake keys.
pub async fn store_snapshot(
    redis: &redis::Client,
    user_id: Uuid,
    snapshot: &IntakeSnapshot,
) -> Result<(), AppError> {
    let skills = serde_json::to_string(&snapshot.resume_skills)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing resume skills: {e}")))?;
    let details = serde_json::to_string(&snapshot.job_details)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing job details: {e}")))?;

    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set_ex::<_, _, ()>(resume_skills_key(user_id), skills, INTAKE_TTL_SECS)
        .await?;
    conn.set_ex::<_, _, ()>(job_details_key(user_id), details, INTAKE_TTL_SECS)
        .await?;
    conn.set_ex::<_, _, ()>(
        job_description_key(user_id),
        snapshot.job_description.clone(),
        INTAKE_TTL_SECS,
    )
    .await?;

    Ok(())
}

/// Reads the snapshot back. Returns `None` when any of the three values is
/// missing or expired; session start treats that as a state error.
pub async fn load_snapshot(
    redis: &redis::Client,
    user_id: Uuid,
) -> Result<Option<IntakeSnapshot>, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;

    let skills: Option<String> = conn.get(resume_skills_key(user_id)).await?;
    let details: Option<String> = conn.get(job_details_key(user_id)).await?;
    let description: Option<String> = conn.get(job_description_key(user_id)).await?;

    let (Some(skills), Some(details), Some(job_description)) = (skills, details, description)
    else {
        return Ok(None);
    };

    let resume_skills: Vec<String> = serde_json::from_str(&skills)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt cached resume skills: {e}")))?;
    let job_details: ParsedJobDescription = serde_json::from_str(&details)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt cached job details: {e}")))?;

    Ok(Some(IntakeSnapshot {
        resume_skills,
        job_details,
        job_description,
    }))
}

#[cfg(test)]
mod tests {
    use crate::flows::jd_parser::DifficultyLevel;

    use super::*;

    #[test]
    fn test_intake_keys_are_namespaced_per_user() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(resume_skills_key(a), resume_skills_key(b));
        assert!(resume_skills_key(a).ends_with(":resume_skills"));
        assert!(job_details_key(a).ends_with(":job_details"));
        assert!(job_description_key(a).ends_with(":job_description"));
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = IntakeSnapshot {
            resume_skills: vec!["Rust".to_string(), "SQL".to_string()],
            job_details: ParsedJobDescription {
                role: "Backend Engineer".to_string(),
                company: None,
                required_skills: vec!["Go".to_string()],
                proficiency_expectations: "Solid production experience".to_string(),
                difficulty_level: DifficultyLevel::Medium,
            },
            job_description: "We need a Go engineer.".to_string(),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let recovered: IntakeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered.resume_skills, snapshot.resume_skills);
        assert_eq!(recovered.job_details.role, "Backend Engineer");
        assert_eq!(recovered.job_description, snapshot.job_description);
    }
}
