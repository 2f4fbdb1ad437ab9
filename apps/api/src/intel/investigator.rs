//! Company intel: public chatter about an employer, condensed into a
//! culture dossier.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::intel::prompts::DOSSIER_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{truncate_chars, RAW_JSON_INSTRUCTION};
use crate::llm_client::{generate_json, GenerateOptions, Oracle};
use crate::sourcing::search_scrape::SearchClient;

const SNIPPET_SEPARATOR: &str = "\n\n---\n\n";
const MAX_INTEL_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureDossier {
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub work_life_balance: String,
    #[serde(default)]
    pub turnover_risk: String,
    #[serde(default)]
    pub hidden_gems: Vec<String>,
}

impl CultureDossier {
    /// Returned when the search finds nothing to read.
    pub fn insufficient_data() -> Self {
        Self {
            red_flags: vec!["No significant chatter found.".to_string()],
            work_life_balance: "Insufficient data.".to_string(),
            turnover_risk: "Insufficient data.".to_string(),
            hidden_gems: vec![
                "Company might be too small or too new for active internet chatter.".to_string(),
            ],
        }
    }
}

pub fn intel_query(company: &str) -> String {
    format!("\"{company}\" employee reviews OR culture OR \"work environment\" -site:linkedin.com")
}

pub async fn investigate_company(
    search: &SearchClient,
    oracle: &dyn Oracle,
    company: &str,
) -> Result<CultureDossier, AppError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(AppError::Validation(
            "Company name is required for investigation.".to_string(),
        ));
    }

    let snippets = search.snippets(&intel_query(company)).await?;
    info!("Intel search for '{company}' returned {} snippets", snippets.len());

    compile_dossier(oracle, company, &snippets).await
}

/// Zero snippets is not an error: the fixed insufficient-data dossier is
/// returned without calling the oracle.
pub async fn compile_dossier(
    oracle: &dyn Oracle,
    company: &str,
    snippets: &[String],
) -> Result<CultureDossier, AppError> {
    if snippets.is_empty() {
        return Ok(CultureDossier::insufficient_data());
    }

    let compiled = snippets.join(SNIPPET_SEPARATOR);
    let prompt = DOSSIER_PROMPT_TEMPLATE
        .replace("{company}", company)
        .replace("{raw_json_instruction}", RAW_JSON_INSTRUCTION)
        .replace("{snippets}", truncate_chars(&compiled, MAX_INTEL_CHARS));

    let dossier: CultureDossier =
        generate_json(oracle, &prompt, GenerateOptions::structured()).await?;
    Ok(dossier)
}
