// All LLM prompt constants for the four flows. Templates use `{var}`
// placeholders filled by flows::invoker::render_template; JSON examples in
// the templates are literal and never substituted.

/// System prompt for resume parsing — enforces JSON-only output.
pub const RESUME_PARSE_SYSTEM: &str =
    "You are an expert resume analyst. \
    Extract structured information from the attached resume document. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Resume parsing prompt. The PDF travels as a document attachment, not a
/// template variable.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Read the attached resume and extract structured information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["Rust", "PostgreSQL", "Kubernetes"],
  "experience": "Concise prose summary of the candidate's professional experience",
  "tools": ["Docker", "Grafana", "GitHub Actions"],
  "full_text": "The complete plain text extracted from the document"
}

Rules for extraction:
- "skills": every technical skill the candidate demonstrates — languages, frameworks, databases, cloud platforms, concepts. Deduplicate.
- "experience": 2-4 sentences summarizing roles, seniority, and domains.
- "tools": software and services the candidate has used that are not core skills.
- "full_text": the document's entire readable text, preserved as-is. If the document contains no readable text, set this to an empty string."#;

/// System prompt for JD parsing — enforces JSON-only output.
pub const JD_PARSE_SYSTEM: &str =
    "You are an expert job description analyst. \
    Parse a job description and extract structured information. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// JD parsing prompt template. Replace `{jd_text}` before sending.
pub const JD_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following job description and extract structured information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "role": "Senior Backend Engineer",
  "company": "Acme Corp",
  "required_skills": ["Go", "PostgreSQL", "Kubernetes", "gRPC"],
  "proficiency_expectations": "Expects production experience with distributed systems and on-call ownership",
  "difficulty_level": "medium"
}

Rules for parsing:
- "role": the job title as stated, or the closest concise title if unstated.
- "company": the hiring company's name. If no company is detectable, OMIT the field entirely — never output an empty string.
- "required_skills": granular, individually-named technologies and competencies. Split umbrella terms into their constituents — "software engineering" becomes the concrete languages and systems the posting names. Order by importance.
- "proficiency_expectations": 1-2 sentences on the depth of experience expected.
- "difficulty_level": exactly one of "easy", "medium", "hard" — your judgment of how demanding the role is for a typical candidate.

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for interview question generation — enforces JSON-only output.
pub const QUESTION_GEN_SYSTEM: &str =
    "You are an expert technical interviewer designing a mock interview. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Question generation prompt template.
/// Replace: {job_description}, {skill_gaps}, {difficulty}
pub const QUESTION_GEN_PROMPT_TEMPLATE: &str = r#"Generate interview questions for a candidate preparing for the role below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "questions": [
    {
      "question_text": "How would you design an index for this query pattern?",
      "skill": "SQL",
      "difficulty": "medium",
      "type": "technical"
    }
  ]
}

Generate EXACTLY 7 questions with this category distribution:
- 3 of type "technical" (hands-on problem solving)
- 2 of type "conceptual" (depth of understanding)
- 1 of type "scenario" (applied judgment in a realistic situation)
- 1 of type "edge-case" (failure modes, limits, surprising behavior)

Rules:
- Focus the questions on the candidate's skill gaps listed below. If the list is empty, draw from the core skills of the job description instead.
- "skill": the single skill the question targets, matching a gap where possible.
- "difficulty": exactly one of "easy", "medium", "hard" per question. Calibrate around the overall difficulty given below, but vary it per question.
- "type": exactly one of "technical", "conceptual", "scenario", "edge-case".

OVERALL DIFFICULTY: {difficulty}

SKILL GAPS:
{skill_gaps}

JOB DESCRIPTION:
{job_description}"#;

/// System prompt for answer evaluation — enforces JSON-only output.
pub const ANSWER_EVAL_SYSTEM: &str =
    "You are an expert technical interviewer scoring a candidate's answer. \
    Be rigorous but constructive. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Answer evaluation prompt template.
/// Replace: {question_text}, {user_answer}, {skill}, {difficulty}
pub const ANSWER_EVAL_PROMPT_TEMPLATE: &str = r#"Score the candidate's answer to an interview question.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 72,
  "feedback": "Specific, actionable feedback on the answer"
}

Rules for scoring:
- "score": an integer from 0 to 100. 0 means no relevant content; 100 means a complete, correct, well-communicated answer. Use the full range.
- "feedback": 2-4 sentences. Name what the answer got right, what it missed, and one concrete improvement.
- Judge against the expected depth for a "{difficulty}" question on "{skill}" — do not demand more than the difficulty warrants.

QUESTION ({skill}, {difficulty}):
{question_text}

CANDIDATE ANSWER:
{user_answer}"#;
