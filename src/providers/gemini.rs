use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::{AuthMode, Config};
use crate::model::{self, Prompt, Reply};
use crate::providers::http_errors::model_api_request_error;

const API_KEY_HEADER: &str = "x-goog-api-key";
const API_KEY_QUERY_PARAM: &str = "key";

/// The API answered with something other than `200 OK`. The body is kept
/// untouched so it can be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub status: u16,
    pub body: Vec<u8>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model API returned status {}", self.status)
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<CandidateResponse>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateResponse {
    #[serde(default)]
    content: Option<ContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
    #[serde(default)]
    total_token_count: u64,
}

fn generate_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

fn to_parts(texts: &[String]) -> Vec<Part> {
    texts
        .iter()
        .map(|text| Part { text: text.clone() })
        .collect()
}

fn encode_request(prompt: &Prompt) -> Result<Vec<u8>> {
    let body = GenerateContentRequest {
        contents: vec![Content {
            parts: to_parts(&prompt.contents),
        }],
        system_instruction: Content {
            parts: to_parts(&prompt.system),
        },
    };
    serde_json::to_vec(&body).context("failed to encode request")
}

fn decode_reply(body: &[u8]) -> Result<Reply> {
    let parsed: GenerateContentResponse =
        serde_json::from_slice(body).context("failed to decode model response")?;

    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        warn!(block_reason = %reason, "prompt was blocked by the model API");
    }
    if let Some(usage) = &parsed.usage_metadata {
        debug!(
            prompt_tokens = usage.prompt_token_count,
            candidate_tokens = usage.candidates_token_count,
            total_tokens = usage.total_token_count,
            "model usage"
        );
    }

    let candidates = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .map(|candidate| {
            if let Some(reason) = &candidate.finish_reason {
                debug!(finish_reason = %reason, "candidate finished");
            }
            model::Candidate {
                fragments: candidate
                    .content
                    .map(|content| content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect(),
            }
        })
        .collect();

    Ok(Reply { candidates })
}

/// Sends one `generateContent` request and returns every candidate's text.
/// Any status other than 200 comes back as a [`RemoteError`].
pub async fn generate(
    client: &Client,
    cfg: &Config,
    api_key: &str,
    prompt: &Prompt,
) -> Result<Reply> {
    let api_url = generate_url(&cfg.base_url, &cfg.model);
    let body = encode_request(prompt)?;
    debug!(
        api_url = %api_url,
        model = %cfg.model,
        auth = cfg.auth.as_str(),
        fragment_count = prompt.contents.len(),
        body_len = body.len(),
        "sending gemini generateContent request"
    );

    let request = client
        .post(&api_url)
        .header(CONTENT_TYPE, "application/json")
        .body(body);
    let request = match cfg.auth {
        AuthMode::Header => request.header(API_KEY_HEADER, api_key),
        AuthMode::Query => request.query(&[(API_KEY_QUERY_PARAM, api_key)]),
    };

    let response = request.send().await.map_err(|err| {
        let err = err.without_url();
        warn!(
            api_url = %api_url,
            model = %cfg.model,
            error = %err,
            "gemini request failed"
        );
        model_api_request_error(err, &api_url, cfg.timeout_secs)
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        warn!(
            api_url = %api_url,
            model = %cfg.model,
            status = %status,
            response_body_len = body.len(),
            "gemini returned non-200 status"
        );
        return Err(RemoteError {
            status: status.as_u16(),
            body,
        }
        .into());
    }

    let body = response
        .bytes()
        .await
        .context("failed to read model response body")?;
    let reply = decode_reply(&body)?;
    debug!(
        model = %cfg.model,
        candidate_count = reply.candidates.len(),
        response_len = body.len(),
        "received gemini response"
    );
    Ok(reply)
}
