//! Pure scoring math for sessions: skill gaps, the readiness score, and the
//! per-skill breakdown behind best/worst-skill reporting.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Required skills the resume does not cover. Case-insensitive exact string
/// match, no fuzzy or synonym matching; the order of `required_skills` is
/// preserved.
pub fn skill_gap(required_skills: &[String], resume_skills: &[String]) -> Vec<String> {
    let known: HashSet<String> = resume_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    required_skills
        .iter()
        .filter(|skill| !known.contains(&skill.trim().to_lowercase()))
        .cloned()
        .collect()
}

/// Readiness score: integer rounding of the mean of question scores.
/// `None` for an empty score list.
pub fn overall_score(scores: &[u8]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    Some((sum as f64 / scores.len() as f64).round() as u8)
}

/// Average score for one skill, in first-encountered order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: String,
    pub average: f64,
    pub question_count: usize,
}

/// Groups (skill, score) pairs into per-skill averages. Skills appear in the
/// order they are first encountered.
pub fn skill_breakdown(pairs: &[(String, u8)]) -> Vec<SkillScore> {
    let mut breakdown: Vec<SkillScore> = Vec::new();

    for (skill, score) in pairs {
        match breakdown.iter_mut().find(|entry| entry.skill == *skill) {
            Some(entry) => {
                let total = entry.average * entry.question_count as f64 + f64::from(*score);
                entry.question_count += 1;
                entry.average = total / entry.question_count as f64;
            }
            None => breakdown.push(SkillScore {
                skill: skill.clone(),
                average: f64::from(*score),
                question_count: 1,
            }),
        }
    }

    breakdown
}

/// Best- and worst-performing skill by average score. Ties break toward the
/// skill encountered first.
pub fn best_and_worst(breakdown: &[SkillScore]) -> Option<(&SkillScore, &SkillScore)> {
    let first = breakdown.first()?;
    let mut best = first;
    let mut worst = first;

    for entry in &breakdown[1..] {
        if entry.average > best.average {
            best = entry;
        }
        if entry.average < worst.average {
            worst = entry;
        }
    }

    Some((best, worst))
}
