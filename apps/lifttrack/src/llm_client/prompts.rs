// Shared prompt fragments.
// Each feature that calls the LLM keeps its own prompts.rs alongside it;
// only cross-cutting pieces live here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps free-text fields short enough for a dashboard card.
pub const BREVITY_INSTRUCTION: &str = "\
    Every string field is a single direct sentence of at most 20 words. \
    No hedging, no filler, no motivational slogans.";
