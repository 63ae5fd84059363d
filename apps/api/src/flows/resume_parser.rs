//! Resume parsing flow — extracts skills, an experience summary, and tools
//! from an uploaded PDF. The whole document is sent to the provider as one
//! multimodal input; nothing is parsed locally.

use serde::{Deserialize, Serialize};

use crate::flows::invoker::{invoke, FlowError, PromptSpec, TemplateVars};
use crate::flows::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};
use crate::llm_client::{CompletionProvider, DocumentAttachment};

const FLOW: &str = "parse-resume";

/// Input: the uploaded resume as a base64 data URI
/// (`data:<media-type>;base64,<payload>`).
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeUpload {
    pub resume_data_uri: String,
}

/// Structured output of resume parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResume {
    pub skills: Vec<String>,
    pub experience: String,
    pub tools: Vec<String>,
    pub full_text: String,
}

/// Splits a data URI into (media type, base64 payload).
///
/// A URI without a MIME-type prefix is rejected here, before any network
/// call is made.
fn data_uri_parts(uri: &str) -> Result<(&str, &str), FlowError> {
    let rest = uri.strip_prefix("data:").ok_or_else(|| FlowError::Validation {
        flow: FLOW,
        message: "resume must be a data URI with a MIME type prefix (data:<type>;base64,...)"
            .to_string(),
    })?;

    let (media_type, payload) = rest.split_once(";base64,").ok_or_else(|| FlowError::Validation {
        flow: FLOW,
        message: "resume data URI must be base64-encoded (missing ';base64,' marker)".to_string(),
    })?;

    if media_type.is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "resume data URI is missing its MIME type".to_string(),
        });
    }
    if payload.is_empty() {
        return Err(FlowError::Validation {
            flow: FLOW,
            message: "resume data URI has an empty document payload".to_string(),
        });
    }

    Ok((media_type, payload))
}

fn validate_upload(input: &ResumeUpload) -> Result<(), FlowError> {
    data_uri_parts(&input.resume_data_uri).map(|_| ())
}

fn attachment(input: &ResumeUpload) -> Option<DocumentAttachment> {
    // Input validation already ran; a malformed URI cannot reach this point.
    data_uri_parts(&input.resume_data_uri)
        .ok()
        .map(|(media_type, data)| DocumentAttachment {
            media_type: media_type.to_string(),
            base64_data: data.to_string(),
        })
}

fn validate_parsed(output: &ParsedResume) -> Result<(), FlowError> {
    if output.full_text.trim().is_empty() {
        return Err(FlowError::Extraction {
            flow: FLOW,
            message: "could not extract text from the uploaded resume".to_string(),
        });
    }
    Ok(())
}

fn spec() -> PromptSpec<ResumeUpload, ParsedResume> {
    PromptSpec {
        name: FLOW,
        system: RESUME_PARSE_SYSTEM,
        template: RESUME_PARSE_PROMPT_TEMPLATE,
        validate_input: validate_upload,
        vars: |_| Ok(TemplateVars::new()),
        attachment,
        validate_output: validate_parsed,
    }
}

/// Parses an uploaded resume into a `ParsedResume`.
pub async fn parse_resume(
    provider: &dyn CompletionProvider,
    upload: &ResumeUpload,
) -> Result<ParsedResume, FlowError> {
    invoke(provider, &spec(), upload).await
}
