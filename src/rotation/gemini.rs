//! Gemini client for the `generateContent` API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{RotationProvider, RotationRequest, RotationResponse};
use crate::config::GeminiConfig;
use crate::errors::AppError;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client using structured JSON output.
///
/// One request per rotation, no retries; the transport's default timeout applies.
pub struct GeminiClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Self {
            client: Client::new(),
            url,
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Prompt asking for a balanced two-days-remote rotation.
pub fn build_prompt(request: &RotationRequest) -> String {
    format!(
        "You are a team scheduler assistant.\n\
         Generate a work-from-home (WFH) rotation schedule for the following employees:\n\
         {names}.\n\
         \n\
         Rules:\n\
         1. Each person should have exactly 2 days of WFH (Remote) per week (Mon-Fri).\n\
         2. The other 3 days are Office.\n\
         3. Try to balance the team so not everyone is WFH on the same day.\n\
         4. Week starts on: {week_start}.\n\
         5. Additional Constraints/Notes: {constraints}\n\
         \n\
         Return ONLY the raw JSON data adhering to the schema.",
        names = request.employee_names.join(", "),
        week_start = request.week_start.format("%Y-%m-%d"),
        constraints = request.constraints,
    )
}

/// Schema of [`RotationResponse`] in Gemini's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "schedules": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "employeeName": { "type": "STRING" },
                        "schedule": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "day": { "type": "STRING", "description": "Day name e.g., Monday" },
                                    "status": { "type": "STRING", "enum": ["OFFICE", "WFH"] }
                                },
                                "required": ["day", "status"]
                            }
                        }
                    },
                    "required": ["employeeName", "schedule"]
                }
            }
        },
        "required": ["schedules"]
    })
}

/// Extract the rotation from a raw `generateContent` response body.
fn parse_generated(raw: &str) -> Result<RotationResponse, AppError> {
    let parsed: GenerateContentResponse = serde_json::from_str(raw)
        .map_err(|e| AppError::AiService(format!("unreadable response envelope: {}", e)))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::AiService("No response from AI".to_string()));
    }

    serde_json::from_str(&text)
        .map_err(|e| AppError::AiService(format!("response does not match schema: {}", e)))
}

fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

#[async_trait]
impl RotationProvider for GeminiClient {
    async fn generate(&self, request: &RotationRequest) -> Result<RotationResponse, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::AiService("API key not found, set GEMINI_API_KEY".to_string())
        })?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: build_prompt(request),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let resp = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;

        if !status.is_success() {
            return Err(AppError::AiService(format!(
                "HTTP {} - {}",
                status,
                truncate(&raw, 500)
            )));
        }

        tracing::debug!("Gemini response: {}", truncate(&raw, 500));
        parse_generated(&raw)
    }
}
