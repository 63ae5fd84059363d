//! JD Parser — extracts the role, required skills, and difficulty from a raw
//! job description. The input text is unbounded; no truncation is performed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::flows::invoker::{invoke, no_attachment, FlowError, PromptSpec, TemplateVars};
use crate::flows::prompts::{JD_PARSE_PROMPT_TEMPLATE, JD_PARSE_SYSTEM};
use crate::llm_client::CompletionProvider;

const FLOW: &str = "parse-jd";

/// Overall difficulty of a role or a single question. Closed set: any other
/// value is a deserialization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(DifficultyLevel::Easy),
            "medium" => Some(DifficultyLevel::Medium),
            "hard" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }
}

/// Input: the raw job description text as submitted by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPosting {
    pub jd_text: String,
}

/// Structured output of JD parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    pub role: String,
    /// Absent when no company is detectable; never an empty string.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub required_skills: Vec<String>,
    pub proficiency_expectations: String,
    pub difficulty_level: DifficultyLevel,
}

/// Normalizes a blank company string to `None` so callers see one shape.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn validate_posting(input: &JobPosting) -> Result<(), FlowError> {
    if input.jd_text.trim().is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "job description text must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_parsed(output: &ParsedJobDescription) -> Result<(), FlowError> {
    if output.role.trim().is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "parsed job description has an empty role".to_string(),
        });
    }
    if output.required_skills.is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "parsed job description has no required skills".to_string(),
        });
    }
    Ok(())
}

fn spec() -> PromptSpec<JobPosting, ParsedJobDescription> {
    PromptSpec {
        name: FLOW,
        system: JD_PARSE_SYSTEM,
        template: JD_PARSE_PROMPT_TEMPLATE,
        validate_input: validate_posting,
        vars: |input| Ok(TemplateVars::new().text("jd_text", &input.jd_text)),
        attachment: no_attachment,
        validate_output: validate_parsed,
    }
}

/// Parses a job description into a `ParsedJobDescription`.
pub async fn parse_job_description(
    provider: &dyn CompletionProvider,
    posting: &JobPosting,
) -> Result<ParsedJobDescription, FlowError> {
    invoke(provider, &spec(), posting).await
}

#[cfg(test)]
mod tests {
    use crate::flows::invoker::test_support::CannedProvider;

    use super::*;

    const PARSED_FIXTURE: &str = r#"{
        "role": "Senior Backend Engineer",
        "company": "Acme Corp",
        "required_skills": ["Go", "PostgreSQL", "Kubernetes"],
        "proficiency_expectations": "Production experience with distributed systems.",
        "difficulty_level": "hard"
    }"#;

    #[test]
    fn test_difficulty_level_deserializes_all_members() {
        for (json, expected) in [
            (r#""easy""#, DifficultyLevel::Easy),
            (r#""medium""#, DifficultyLevel::Medium),
            (r#""hard""#, DifficultyLevel::Hard),
        ] {
            let level: DifficultyLevel = serde_json::from_str(json).unwrap();
            assert_eq!(level, expected);
        }
    }

    #[test]
    fn test_difficulty_level_rejects_values_outside_the_set() {
        let result: Result<DifficultyLevel, _> = serde_json::from_str(r#""extreme""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_difficulty_level_round_trips_through_as_str() {
        for level in [
            DifficultyLevel::Easy,
            DifficultyLevel::Medium,
            DifficultyLevel::Hard,
        ] {
            assert_eq!(DifficultyLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(DifficultyLevel::parse("impossible"), None);
    }

    #[test]
    fn test_parsed_jd_deserializes_fixture() {
        let parsed: ParsedJobDescription = serde_json::from_str(PARSED_FIXTURE).unwrap();
        assert_eq!(parsed.role, "Senior Backend Engineer");
        assert_eq!(parsed.company.as_deref(), Some("Acme Corp"));
        assert_eq!(parsed.required_skills.len(), 3);
        assert_eq!(parsed.difficulty_level, DifficultyLevel::Hard);
    }

    #[test]
    fn test_missing_company_deserializes_to_none() {
        let json = r#"{
            "role": "Engineer",
            "required_skills": ["Rust"],
            "proficiency_expectations": "Some",
            "difficulty_level": "easy"
        }"#;
        let parsed: ParsedJobDescription = serde_json::from_str(json).unwrap();
        assert!(parsed.company.is_none());
    }

    #[test]
    fn test_empty_company_string_normalizes_to_none() {
        let json = r#"{
            "role": "Engineer",
            "company": "",
            "required_skills": ["Rust"],
            "proficiency_expectations": "Some",
            "difficulty_level": "easy"
        }"#;
        let parsed: ParsedJobDescription = serde_json::from_str(json).unwrap();
        assert!(parsed.company.is_none());
    }

    #[test]
    fn test_none_company_is_omitted_when_serialized() {
        let parsed = ParsedJobDescription {
            role: "Engineer".to_string(),
            company: None,
            required_skills: vec!["Rust".to_string()],
            proficiency_expectations: "Some".to_string(),
            difficulty_level: DifficultyLevel::Easy,
        };
        let value = serde_json::to_value(&parsed).unwrap();
        assert!(value.get("company").is_none());
    }

    #[tokio::test]
    async fn test_empty_jd_text_never_reaches_provider() {
        let provider = CannedProvider::ok(PARSED_FIXTURE);
        let posting = JobPosting {
            jd_text: "   ".to_string(),
        };
        let result = parse_job_description(&provider, &posting).await;
        assert!(matches!(result, Err(FlowError::Validation { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_injects_jd_text_into_prompt() {
        let provider = CannedProvider::ok(PARSED_FIXTURE);
        let posting = JobPosting {
            jd_text: "We need a Go engineer with PostgreSQL depth.".to_string(),
        };
        let parsed = parse_job_description(&provider, &posting).await.unwrap();
        assert_eq!(parsed.difficulty_level, DifficultyLevel::Hard);

        let request = provider.last_request.lock().unwrap().take().unwrap();
        assert!(request.prompt.contains("We need a Go engineer"));
        assert!(request.document.is_none());
    }

    #[tokio::test]
    async fn test_empty_required_skills_fails_output_validation() {
        let provider = CannedProvider::ok(
            r#"{
                "role": "Engineer",
                "required_skills": [],
                "proficiency_expectations": "Some",
                "difficulty_level": "easy"
            }"#,
        );
        let posting = JobPosting {
            jd_text: "A role".to_string(),
        };
        let result = parse_job_description(&provider, &posting).await;
        assert!(matches!(result, Err(FlowError::Validation { .. })));
    }
}
