//! LLM client: the single point of entry for all Gemini API calls in LiftTrack.
//!
//! No other module talks to the inference service directly. Every call asks
//! for JSON output constrained by a response schema.
//!
//! Model: fixed, not configurable.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for all LLM calls in LiftTrack.
pub const MODEL: &str = "gemini-3-flash-preview";
const MAX_OUTPUT_TOKENS: u32 = 1024;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Response violated schema: {0}")]
    Schema(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: RequestContent<'a>,
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Extracts the text of the first candidate's first text part.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single LLM client used by LiftTrack.
/// Wraps the Gemini `generateContent` API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent")
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        schema: &Value,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = GenerateRequest {
            system_instruction: RequestContent {
                role: None,
                parts: vec![RequestPart { text: system }],
            },
            contents: vec![RequestContent {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            let usage = llm_response.usage_metadata.as_ref();
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.map_or(0, |u| u.prompt_token_count),
                usage.map_or(0, |u| u.candidates_token_count)
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the LLM with a response schema and deserializes the text as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        schema: &Value,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system, schema).await?;
        parse_json_text(response.text())
    }
}

fn parse_json_text<T: DeserializeOwned>(text: Option<&str>) -> Result<T, LlmError> {
    let text = text.ok_or(LlmError::EmptyContent)?;
    // Schema mode should not fence, but models occasionally do anyway.
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"analysis\": \"ok\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"analysis\": \"ok\"}");
    }

    #[test]
    fn test_strip_fences_untagged_and_unterminated() {
        assert_eq!(strip_json_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_json_fences("```json\n{}"), "{}");
        assert_eq!(strip_json_fences("  {} "), "{}");
    }

    #[test]
    fn test_request_uses_gemini_field_names() {
        let schema = json!({"type": "OBJECT"});
        let body = GenerateRequest {
            system_instruction: RequestContent {
                role: None,
                parts: vec![RequestPart { text: "sys" }],
            },
            contents: vec![RequestContent {
                role: Some("user"),
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
                max_output_tokens: 10,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_extraction() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":1}"}], "role": "model"}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("{\"a\":1}"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: LlmResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
        assert!(matches!(
            parse_json_text::<Value>(response.text()),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_blank_text_counts_as_empty() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_parse_json_text_rejects_garbage() {
        assert!(matches!(
            parse_json_text::<Value>(Some("not json")),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn test_endpoint_names_the_model() {
        let client = LlmClient::new("k".to_string()).unwrap();
        assert!(client.endpoint().ends_with(&format!("/models/{MODEL}:generateContent")));
    }
}
