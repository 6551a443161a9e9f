// All LLM prompt constants for the Tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for résumé tailoring.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer. \
    You rewrite an existing resume so it targets one specific job posting. \
    Keep the candidate's voice and the resume's section structure.";

/// Tailoring prompt template.
/// Replace: {factuality_instruction}, {company}, {position}, {description}, {resume}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{factuality_instruction}

TARGET ROLE: {position} at {company}

JOB DESCRIPTION:
{description}

CURRENT RESUME:
{resume}

Rewrite the resume for this role:
1. Lead with the experience most relevant to the job description
2. Mirror the posting's terminology where the resume already supports it
3. Tighten or drop content that does not serve this role
4. Keep every fact verifiable against the current resume

Return the complete tailored resume as plain text."#;
