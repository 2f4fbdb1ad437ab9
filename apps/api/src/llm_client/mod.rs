/// LLM Client: the single point of entry for all oracle calls in the service.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Stages receive a `&dyn Oracle` and never construct a client themselves.
///
/// Model: claude-sonnet-4-5 (hardcoded: do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub mod prompts;

use prompts::{FREE_TEXT_SYSTEM, JSON_ONLY_SYSTEM};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 8192;
const WEB_SEARCH_MAX_USES: u32 = 5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call switches for the oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Demand machine-readable JSON with no prose wrapper.
    pub structured_output: bool,
    /// Allow the model to search the web before answering.
    pub web_search: bool,
}

impl GenerateOptions {
    pub fn structured() -> Self {
        Self {
            structured_output: true,
            web_search: false,
        }
    }

    pub fn grounded() -> Self {
        Self {
            structured_output: true,
            web_search: true,
        }
    }

    pub fn free_text() -> Self {
        Self::default()
    }
}

/// The text-generation oracle. A best-effort black box whose output callers
/// must parse defensively.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, instructions: &str, options: GenerateOptions)
        -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    name: &'static str,
    max_uses: u32,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Concatenates the text blocks of the final answer. With web search the
    /// model may narrate before a tool call; only the text after the last tool
    /// result is the answer, and it can still be split across several blocks.
    pub fn text(&self) -> Option<String> {
        let answer_start = self
            .content
            .iter()
            .rposition(|b| b.block_type.ends_with("tool_result"))
            .map_or(0, |idx| idx + 1);
        let joined: String = self.content[answer_start..]
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by all stages.
/// Wraps the Anthropic Messages API. One attempt per call: a failed call is
/// reported upward and the caller decides whether to resubmit.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        web_search: bool,
    ) -> Result<LlmResponse, LlmError> {
        let tools = if web_search {
            vec![AnthropicTool {
                tool_type: "web_search_20250305",
                name: "web_search",
                max_uses: WEB_SEARCH_MAX_USES,
            }]
        } else {
            Vec::new()
        };

        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
            tools,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}", status);
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl Oracle for LlmClient {
    async fn generate(
        &self,
        instructions: &str,
        options: GenerateOptions,
    ) -> Result<String, LlmError> {
        let system = if options.structured_output {
            JSON_ONLY_SYSTEM
        } else {
            FREE_TEXT_SYSTEM
        };
        let response = self.call(instructions, system, options.web_search).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Calls the oracle for structured output and deserializes the reply.
/// The instructions must describe the exact JSON shape expected.
pub async fn generate_json<T: DeserializeOwned>(
    oracle: &dyn Oracle,
    instructions: &str,
    options: GenerateOptions,
) -> Result<T, LlmError> {
    let text = oracle.generate(instructions, options).await?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    parse_structured(&text)
}

/// Extracts a structured payload from free oracle text.
///
/// Contract: surrounding whitespace and one markdown code fence (with or
/// without a language tag) are removed, then the remainder must parse as `T`.
/// Nothing else is repaired. On failure the raw text is logged, never returned.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let payload = strip_json_fences(text);
    serde_json::from_str(payload).map_err(|e| {
        error!(raw_output = %text, "Failed to parse structured oracle output: {e}");
        LlmError::Parse(e)
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Idempotent: stripping an already stripped payload returns it unchanged.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop an optional language tag on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) if rest[..idx].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[idx + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
