// Tailoring: turns the résumé plus the selected job description into a tailored résumé.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod tailor;
