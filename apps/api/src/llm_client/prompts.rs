// Shared prompt constants and prompt-building utilities.
// Each stage that needs oracle calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for plain prose answers.
pub const FREE_TEXT_SYSTEM: &str = "You are a concise career analyst. \
    Answer with plain text only. No conversational filler, no markdown headings.";

/// Appended to every structured prompt that embeds user data.
pub const RAW_JSON_INSTRUCTION: &str = "\
    Return ONLY strictly valid JSON. No markdown formatting, no code blocks, \
    no commentary before or after the JSON.";

/// Maximum characters of caller-supplied free text embedded in one prompt.
pub const MAX_EMBEDDED_TEXT_CHARS: usize = 5000;

/// Truncates `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Renders an optional free-text field, substituting `fallback` when blank.
pub fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}
