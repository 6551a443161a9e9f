// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces plain-text output.
pub const PLAIN_TEXT_SYSTEM: &str = "Respond with the requested document only. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include explanations, preambles, or apologies.";

/// Common instruction appended to every rewriting prompt.
pub const FACTUALITY_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the source resume. \
    Do NOT invent employers, dates, titles, degrees, metrics, or skills. \
    Rephrase, reorder, and emphasize; never fabricate.";
