//! Answer evaluation flow — scores one free-text answer against its
//! question. Called once per submitted answer; the result is terminal for
//! that question.

use serde::{Deserialize, Serialize};

use crate::flows::invoker::{invoke, no_attachment, FlowError, PromptSpec, TemplateVars};
use crate::flows::jd_parser::DifficultyLevel;
use crate::flows::prompts::{ANSWER_EVAL_PROMPT_TEMPLATE, ANSWER_EVAL_SYSTEM};
use crate::llm_client::CompletionProvider;

const FLOW: &str = "evaluate-answer";

/// Input: the question being answered and the candidate's free-text answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerSubmission {
    pub question_text: String,
    pub user_answer: String,
    pub skill: String,
    pub difficulty: DifficultyLevel,
}

/// Output: an integer score in 0..=100 and non-empty feedback. Immutable
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
}

fn validate_submission(input: &AnswerSubmission) -> Result<(), FlowError> {
    if input.question_text.trim().is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "question text must not be empty".to_string(),
        });
    }
    if input.user_answer.trim().is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "answer must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_evaluation(output: &Evaluation) -> Result<(), FlowError> {
    if output.score > 100 {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: format!("score {} is outside 0..=100", output.score),
        });
    }
    if output.feedback.trim().is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "evaluation feedback must not be empty".to_string(),
        });
    }
    Ok(())
}

fn spec() -> PromptSpec<AnswerSubmission, Evaluation> {
    PromptSpec {
        name: FLOW,
        system: ANSWER_EVAL_SYSTEM,
        template: ANSWER_EVAL_PROMPT_TEMPLATE,
        validate_input: validate_submission,
        vars: |input| {
            Ok(TemplateVars::new()
                .text("question_text", &input.question_text)
                .text("user_answer", &input.user_answer)
                .text("skill", &input.skill)
                .text("difficulty", input.difficulty.as_str()))
        },
        attachment: no_attachment,
        validate_output: validate_evaluation,
    }
}

/// Scores one submitted answer.
pub async fn evaluate_answer(
    provider: &dyn CompletionProvider,
    submission: &AnswerSubmission,
) -> Result<Evaluation, FlowError> {
    invoke(provider, &spec(), submission).await
}

#[cfg(test)]
mod tests {
    use crate::flows::invoker::test_support::CannedProvider;

    use super::*;

    fn submission_fixture() -> AnswerSubmission {
        AnswerSubmission {
            question_text: "How do indexes speed up queries?".to_string(),
            user_answer: "They let the planner skip full table scans.".to_string(),
            skill: "SQL".to_string(),
            difficulty: DifficultyLevel::Medium,
        }
    }

    #[tokio::test]
    async fn test_evaluate_answer_happy_path() {
        let provider =
            CannedProvider::ok(r#"{"score": 72, "feedback": "Good grasp of the basics."}"#);
        let evaluation = evaluate_answer(&provider, &submission_fixture())
            .await
            .unwrap();
        assert_eq!(evaluation.score, 72);
        assert!(!evaluation.feedback.is_empty());
    }

    #[tokio::test]
    async fn test_score_of_zero_is_accepted() {
        let provider = CannedProvider::ok(r#"{"score": 0, "feedback": "No relevant content."}"#);
        let evaluation = evaluate_answer(&provider, &submission_fixture())
            .await
            .unwrap();
        assert_eq!(evaluation.score, 0);
    }

    #[tokio::test]
    async fn test_score_of_one_hundred_is_accepted() {
        let provider = CannedProvider::ok(r#"{"score": 100, "feedback": "Complete and correct."}"#);
        let evaluation = evaluate_answer(&provider, &submission_fixture())
            .await
            .unwrap();
        assert_eq!(evaluation.score, 100);
    }

    #[tokio::test]
    async fn test_score_above_one_hundred_is_rejected() {
        let provider = CannedProvider::ok(r#"{"score": 101, "feedback": "Too generous."}"#);
        let result = evaluate_answer(&provider, &submission_fixture()).await;
        assert!(matches!(result, Err(FlowError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_negative_score_fails_deserialization() {
        let provider = CannedProvider::ok(r#"{"score": -5, "feedback": "Impossible."}"#);
        let result = evaluate_answer(&provider, &submission_fixture()).await;
        assert!(matches!(result, Err(FlowError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_empty_feedback_is_rejected() {
        let provider = CannedProvider::ok(r#"{"score": 50, "feedback": "  "}"#);
        let result = evaluate_answer(&provider, &submission_fixture()).await;
        assert!(matches!(result, Err(FlowError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_empty_answer_never_reaches_provider() {
        let provider = CannedProvider::ok(r#"{"score": 50, "feedback": "ok"}"#);
        let submission = AnswerSubmission {
            user_answer: "   ".to_string(),
            ..submission_fixture()
        };
        let result = evaluate_answer(&provider, &submission).await;
        assert!(matches!(result, Err(FlowError::Validation { .. })));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_carries_question_answer_and_difficulty() {
        let provider = CannedProvider::ok(r#"{"score": 60, "feedback": "Decent."}"#);
        evaluate_answer(&provider, &submission_fixture())
            .await
            .unwrap();

        let request = provider.last_request.lock().unwrap().take().unwrap();
        assert!(request.prompt.contains("How do indexes speed up queries?"));
        assert!(request.prompt.contains("skip full table scans"));
        assert!(request.prompt.contains(r#"a "medium" question on "SQL""#));
    }
}
