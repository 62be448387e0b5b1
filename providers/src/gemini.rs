//! Gemini GenerateContent request/response handling.
//!
//! Communicates with `{base}/models/{model}:generateContent` using structured
//! output: the request carries a `responseSchema` for
//! `{title, content, warningLevel}` and `responseMimeType: application/json`,
//! so the reply text is a single JSON document that deserializes directly
//! into [`Explanation`].
//!
//! Note: the Gemini API mixes casing - `system_instruction` is snake_case
//! while `generationConfig` and its children are camelCase.

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};

use venosim_types::{ApiKey, Explanation, Stage};

const MAX_OUTPUT_TOKENS: u32 = 512;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Persona shared by every stage prompt.
const SYSTEM_INSTRUCTION: &str = "You are a vascular surgeon and medical educator \
specializing in phlebology. Explain the mechanics of varicose veins and thrombosis \
to a layperson, clearly and concisely. Keep each explanation under 80 words and \
focus on blood-flow physics and physiological danger.";

/// Fixed natural-language instruction describing what must be explained for
/// each stage.
#[must_use]
pub fn stage_prompt(stage: Stage) -> &'static str {
    match stage {
        Stage::Normal => {
            "Explain how healthy leg veins pump blood back to the heart against \
             gravity using one-way valves."
        }
        Stage::Varicose => {
            "Explain what happens structurally in varicose veins: valve failure, \
             vessel dilation, and blood reflux."
        }
        Stage::ThrombusFormed => {
            "Explain how slow, stagnant flow (stasis) in varicose veins leads to \
             the formation of a thrombus (clot)."
        }
        Stage::Detaching => {
            "Explain the mechanics of the moment a thrombus breaks free from the \
             vein wall and becomes an embolus."
        }
        Stage::PostEmbolism => {
            "Explain the danger of a detached clot travelling with the blood into \
             the lungs and causing a pulmonary embolism (PE). Use an urgent tone."
        }
    }
}

/// JSON schema for the structured reply.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "warningLevel": {
                "type": "STRING",
                "enum": ["info", "warning", "critical"]
            }
        },
        "required": ["title", "content", "warningLevel"]
    })
}

/// Build the GenerateContent request body for a stage.
#[must_use]
pub fn build_request_body(stage: Stage) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": stage_prompt(stage) }]
        }],
        "system_instruction": {
            "parts": [{ "text": SYSTEM_INSTRUCTION }]
        },
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "temperature": 1.0,
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

// ============================================================================
// Typed response
// ============================================================================

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Response {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ApiError>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct Content {
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct Part {
    pub text: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiError {
    pub message: Option<String>,
}

/// Pull the structured explanation out of a GenerateContent reply.
pub(crate) fn extract_explanation(response: Response) -> Result<Explanation> {
    if let Some(error) = response.error {
        bail!(
            "API error: {}",
            error.message.as_deref().unwrap_or("unknown error")
        );
    }

    let text: String = response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                candidates.swap_remove(0).content
            }
        })
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .ok_or_else(|| anyhow!("Reply carried no candidate content"))?;

    if text.trim().is_empty() {
        bail!("Reply text was empty");
    }

    let explanation: Explanation =
        serde_json::from_str(&text).context("Reply text was not the expected JSON shape")?;

    // Schema conformance does not guarantee non-empty strings.
    Explanation::try_new(explanation.title, explanation.content, explanation.severity)
        .map_err(|e| anyhow!("Reply failed validation: {e}"))
}

/// Issue one GenerateContent call for a stage.
pub(crate) async fn generate(
    http: &reqwest::Client,
    base_url: &str,
    model: &str,
    api_key: &ApiKey,
    stage: Stage,
) -> Result<Explanation> {
    let url = format!("{base_url}/models/{model}:generateContent");
    let body = build_request_body(stage);

    let response = http
        .post(&url)
        .header("x-goog-api-key", api_key.expose_secret())
        .header("content-type", "application/json")
        .json(&body)
        .send()
        .await
        .context("Request transport failure")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = read_capped_error_body(response).await;
        bail!("API error {status}: {error_text}");
    }

    let parsed: Response = response
        .json()
        .await
        .context("Reply was not valid JSON")?;

    extract_explanation(parsed)
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(mut text) => {
            if text.len() > MAX_ERROR_BODY_BYTES {
                text.truncate(MAX_ERROR_BODY_BYTES);
                text.push_str("...(truncated)");
            }
            text
        }
        Err(_) => "(unreadable body)".to_string(),
    }
}
