//! Schema-validated prompt invocation.
//!
//! A flow is a `PromptSpec`: a typed input, a typed output, and a prompt
//! template, defined together so the schema and its validator stay in
//! lockstep. `invoke` is the only path from a flow to the provider: the
//! input is validated before the network call, the output is parsed and
//! validated after it. One call per invocation, no retries.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{CompletionProvider, CompletionRequest, DocumentAttachment, LlmError};

/// Failures a flow invocation can produce. Callers rely on the variants
/// staying distinct: the UI maps each one to a different message.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Local input or output schema mismatch. Never retried.
    #[error("{flow}: {message}")]
    Validation {
        flow: &'static str,
        message: String,
    },

    /// Transient upstream capacity failure (429/529).
    #[error("the AI provider is temporarily overloaded")]
    Overloaded,

    /// Missing or rejected provider credentials (401/403).
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// The provider succeeded but produced no usable content.
    #[error("{message}")]
    Extraction {
        flow: &'static str,
        message: String,
    },

    /// A prompt template variable failed to serialize.
    #[error("failed to render prompt template: {0}")]
    Template(String),

    /// Any other provider-side failure, passed through.
    #[error("provider call failed: {0}")]
    Provider(String),
}

// ────────────────────────────────────────────────────────────────────────────
// PromptSpec
// ────────────────────────────────────────────────────────────────────────────

/// The immutable definition of one flow: name, system prompt, template, and
/// the function hooks that validate input, build template variables, attach
/// an optional document, and validate output.
///
/// Constructed once per flow by a `spec()` function next to the flow's types.
pub struct PromptSpec<I, O> {
    pub name: &'static str,
    pub system: &'static str,
    pub template: &'static str,
    pub validate_input: fn(&I) -> Result<(), FlowError>,
    pub vars: fn(&I) -> Result<TemplateVars, FlowError>,
    pub attachment: fn(&I) -> Option<DocumentAttachment>,
    pub validate_output: fn(&O) -> Result<(), FlowError>,
}

/// No-attachment default for text-only flows.
pub fn no_attachment<I>(_input: &I) -> Option<DocumentAttachment> {
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Template rendering
// ────────────────────────────────────────────────────────────────────────────

/// Ordered set of `{key}` substitutions for a prompt template. Plain text
/// vars are inserted as-is; `json` vars are serialized with serde_json so
/// flows can hand arrays and objects to the template.
#[derive(Debug, Default)]
pub struct TemplateVars {
    vars: Vec<(&'static str, String)>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.vars.push((key, value.into()));
        self
    }

    pub fn json<T: Serialize>(mut self, key: &'static str, value: &T) -> Result<Self, FlowError> {
        let rendered = serde_json::to_string(value)
            .map_err(|e| FlowError::Template(format!("serializing '{key}': {e}")))?;
        self.vars.push((key, rendered));
        Ok(self)
    }
}

/// Substitutes every `{key}` occurrence. Braces that are not a declared
/// variable (e.g. JSON examples inside the template) are left intact.
pub fn render_template(template: &str, vars: &TemplateVars) -> String {
    let mut rendered = template.to_string();
    for (key, value) in &vars.vars {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Invocation
// ────────────────────────────────────────────────────────────────────────────

/// Runs one flow end to end: validate input → render → one provider call →
/// parse → validate output.
///
/// Invalid input fails before anything is sent to the provider. A response
/// that does not parse against the output type is a validation failure,
/// distinct from transport failures.
pub async fn invoke<I, O>(
    provider: &dyn CompletionProvider,
    spec: &PromptSpec<I, O>,
    input: &I,
) -> Result<O, FlowError>
where
    O: DeserializeOwned,
{
    (spec.validate_input)(input)?;

    let vars = (spec.vars)(input)?;
    let prompt = render_template(spec.template, &vars);

    debug!(flow = spec.name, "invoking provider");

    let text = provider
        .complete(CompletionRequest {
            system: spec.system.to_string(),
            prompt,
            document: (spec.attachment)(input),
        })
        .await
        .map_err(|e| match e {
            LlmError::Overloaded { .. } => FlowError::Overloaded,
            LlmError::Auth { .. } => FlowError::Configuration(e.to_string()),
            LlmError::EmptyContent => FlowError::Validation {
                flow: spec.name,
                message: "provider returned no text content".to_string(),
            },
            other => FlowError::Provider(other.to_string()),
        })?;

    let output: O =
        serde_json::from_str(strip_json_fences(&text)).map_err(|e| FlowError::Validation {
            flow: spec.name,
            message: format!("provider output failed schema validation: {e}"),
        })?;

    (spec.validate_output)(&output)?;

    Ok(output)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
