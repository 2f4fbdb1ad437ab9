// Company intel prompt templates.

/// Culture dossier synthesis from scraped search snippets.
/// Replace: {company}, {snippets}, {raw_json_instruction}
pub const DOSSIER_PROMPT_TEMPLATE: &str = r#"You are an objective workplace investigator.
Below are raw search-result snippets about what it is like to work at "{company}".

======= SNIPPETS =======
{snippets}
======= END_SNIPPETS =======

Synthesize them into a specific, objective culture dossier.
Do NOT invent anything. If the snippets say nothing about a category, state "Insufficient data found in recent chatter."

Return a JSON object:
{
  "red_flags": ["1-3 specific negatives mentioned by employees"],
  "work_life_balance": "1-2 sentences on workload, PTO or crunch",
  "turnover_risk": "1 sentence on whether people seem to leave quickly",
  "hidden_gems": ["1-3 perks or cultural strengths mentioned"]
}

{raw_json_instruction}"#;
