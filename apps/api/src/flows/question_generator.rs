//! Interview question generation flow. The prompt requests exactly 7
//! questions with a fixed category distribution (3 technical, 2 conceptual,
//! 1 scenario, 1 edge-case). The distribution is a prompt-level instruction:
//! the model's output is accepted as-is, only emptiness is rejected.

use serde::{Deserialize, Serialize};

use crate::flows::invoker::{invoke, no_attachment, FlowError, PromptSpec, TemplateVars};
use crate::flows::jd_parser::DifficultyLevel;
use crate::flows::prompts::{QUESTION_GEN_PROMPT_TEMPLATE, QUESTION_GEN_SYSTEM};
use crate::llm_client::CompletionProvider;

const FLOW: &str = "generate-questions";

/// How many questions the prompt asks for.
pub const QUESTION_COUNT: usize = 7;

/// Question category. Closed set: any other value is a deserialization
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Technical,
    Conceptual,
    Scenario,
    EdgeCase,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Technical => "technical",
            QuestionType::Conceptual => "conceptual",
            QuestionType::Scenario => "scenario",
            QuestionType::EdgeCase => "edge-case",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "technical" => Some(QuestionType::Technical),
            "conceptual" => Some(QuestionType::Conceptual),
            "scenario" => Some(QuestionType::Scenario),
            "edge-case" => Some(QuestionType::EdgeCase),
            _ => None,
        }
    }
}

/// Input: the job description, the computed skill gaps (in required-skill
/// order), and the overall difficulty label from JD parsing.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest {
    pub job_description: String,
    pub skill_gaps: Vec<String>,
    pub difficulty: DifficultyLevel,
}

/// One generated question. Carries its own difficulty and type, independent
/// of the overall job difficulty label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub skill: String,
    pub difficulty: DifficultyLevel,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

/// The ordered question batch as returned by the provider. Insertion order
/// is presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBatch {
    pub questions: Vec<GeneratedQuestion>,
}

fn validate_request(input: &QuestionRequest) -> Result<(), FlowError> {
    if input.job_description.trim().is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "job description must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_batch(output: &QuestionBatch) -> Result<(), FlowError> {
    if output.questions.is_empty() {
        return Err(FlowError::Extraction {
            flow: FLOW,
            message: "Failed to generate interview questions".to_string(),
        });
    }
    for question in &output.questions {
        if question.question_text.trim().is_empty() {
            return Err(FlowError::Validation {
                flow: FLOW,
                message: "generated question has empty text".to_string(),
            });
        }
    }
    Ok(())
}

fn spec() -> PromptSpec<QuestionRequest, QuestionBatch> {
    PromptSpec {
        name: FLOW,
        system: QUESTION_GEN_SYSTEM,
        template: QUESTION_GEN_PROMPT_TEMPLATE,
        validate_input: validate_request,
        vars: |input| {
            Ok(TemplateVars::new()
                .text("difficulty", input.difficulty.as_str())
                .json("skill_gaps", &input.skill_gaps)?
                .text("job_description", &input.job_description))
        },
        attachment: no_attachment,
        validate_output: validate_batch,
    }
}

/// Generates the interview question batch for a session.
pub async fn generate_questions(
    provider: &dyn CompletionProvider,
    request: &QuestionRequest,
) -> Result<QuestionBatch, FlowError> {
    invoke(provider, &spec(), request).await
}

#[cfg(test)]
mod tests {
    use crate::flows::invoker::test_support::CannedProvider;

    use super::*;

    fn batch_fixture() -> String {
        let questions: Vec<serde_json::Value> = (0..QUESTION_COUNT)
            .map(|i| {
                serde_json::json!({
                    "question_text": format!("Question {i}"),
                    "skill": "SQL",
                    "difficulty": "medium",
                    "type": if i < 3 { "technical" } else { "conceptual" }
                })
            })
            .collect();
        serde_json::json!({ "questions": questions }).to_string()
    }

    fn request_fixture() -> QuestionRequest {
        QuestionRequest {
            job_description: "Backend role with heavy SQL usage.".to_string(),
            skill_gaps: vec!["SQL".to_string(), "Go".to_string()],
            difficulty: DifficultyLevel::Medium,
        }
    }

    #[test]
    fn test_question_type_deserializes_all_members() {
        for (json, expected) in [
            (r#""technical""#, QuestionType::Technical),
            (r#""conceptual""#, QuestionType::Conceptual),
            (r#""scenario""#, QuestionType::Scenario),
            (r#""edge-case""#, QuestionType::EdgeCase),
        ] {
            let parsed: QuestionType = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_question_type_rejects_values_outside_the_set() {
        let result: Result<QuestionType, _> = serde_json::from_str(r#""behavioral""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_type_round_trips_through_as_str() {
        for question_type in [
            QuestionType::Technical,
            QuestionType::Conceptual,
            QuestionType::Scenario,
            QuestionType::EdgeCase,
        ] {
            assert_eq!(
                QuestionType::parse(question_type.as_str()),
                Some(question_type)
            );
        }
    }

    #[test]
    fn test_generated_question_uses_type_key_in_json() {
        let json = r#"{
            "question_text": "Explain indexes.",
            "skill": "SQL",
            "difficulty": "easy",
            "type": "conceptual"
        }"#;
        let question: GeneratedQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type, QuestionType::Conceptual);
    }

    #[tokio::test]
    async fn test_generate_questions_happy_path() {
        let provider = CannedProvider::ok(&batch_fixture());
        let batch = generate_questions(&provider, &request_fixture())
            .await
            .unwrap();
        assert_eq!(batch.questions.len(), QUESTION_COUNT);
        assert_eq!(batch.questions[0].skill, "SQL");
    }

    #[tokio::test]
    async fn test_prompt_carries_gaps_difficulty_and_jd() {
        let provider = CannedProvider::ok(&batch_fixture());
        generate_questions(&provider, &request_fixture())
            .await
            .unwrap();

        let request = provider.last_request.lock().unwrap().take().unwrap();
        assert!(request.prompt.contains(r#"["SQL","Go"]"#));
        assert!(request.prompt.contains("OVERALL DIFFICULTY: medium"));
        assert!(request.prompt.contains("Backend role with heavy SQL usage."));
        assert!(request.prompt.contains("EXACTLY 7 questions"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_failure_not_an_empty_success() {
        let provider = CannedProvider::ok(r#"{"questions": []}"#);
        let result = generate_questions(&provider, &request_fixture()).await;
        match result {
            Err(FlowError::Extraction { message, .. }) => {
                assert_eq!(message, "Failed to generate interview questions")
            }
            other => panic!("expected Extraction, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_skill_gaps_are_allowed() {
        // A resume can cover every required skill; questions then draw from
        // the JD's core skills instead.
        let provider = CannedProvider::ok(&batch_fixture());
        let request = QuestionRequest {
            skill_gaps: vec![],
            ..request_fixture()
        };
        let batch = generate_questions(&provider, &request).await.unwrap();
        assert_eq!(batch.questions.len(), QUESTION_COUNT);
    }

    #[tokio::test]
    async fn test_uneven_distribution_is_accepted_as_is() {
        // The category distribution is requested in the prompt but not
        // enforced locally; a deviating batch still succeeds.
        let questions: Vec<serde_json::Value> = (0..QUESTION_COUNT)
            .map(|i| {
                serde_json::json!({
                    "question_text": format!("Question {i}"),
                    "skill": "Go",
                    "difficulty": "hard",
                    "type": "scenario"
                })
            })
            .collect();
        let body = serde_json::json!({ "questions": questions }).to_string();
        let provider = CannedProvider::ok(&body);
        let batch = generate_questions(&provider, &request_fixture())
            .await
            .unwrap();
        assert!(batch
            .questions
            .iter()
            .all(|q| q.question_type == QuestionType::Scenario));
    }
}
