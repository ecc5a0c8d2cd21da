use tracing::debug;

use crate::{
    error::{Result, TldwError},
    provider::Provider,
};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes text.";

/// Returned when the API answers successfully but without any completion text.
pub const NO_SUMMARY: &str = "No summary found.";

/// Transcript budget in characters. A rough stand-in for the model's token limit.
pub const DEFAULT_MAX_CHARS: usize = 12_000;

pub const DEFAULT_WORD_TARGET: u32 = 100;

/// Where and how to ask for a summary.
#[derive(Clone, Debug)]
pub struct SummaryConfig {
    pub provider_name: String,
    pub endpoint: String,
    pub model: String,
    /// Bearer token. Never defaulted; `None` fails before any request is made.
    pub api_key: Option<String>,
    pub max_chars: usize,
    pub word_target: u32,
}

impl SummaryConfig {
    pub fn for_provider(provider: Provider, api_key: Option<String>) -> Self {
        let config = provider.config();
        Self {
            provider_name: provider.name().to_string(),
            endpoint: config.api_url.to_string(),
            model: config.model.to_string(),
            api_key,
            max_chars: DEFAULT_MAX_CHARS,
            word_target: DEFAULT_WORD_TARGET,
        }
    }

    /// The usable token, with any `Bearer ` prefix stripped.
    ///
    /// Empty values and the `YOUR-API-...` style placeholders shipped in sample
    /// configs count as missing.
    pub fn bearer_token(&self) -> Result<&str> {
        let token = self
            .api_key
            .as_deref()
            .map(|key| {
                let key = key.trim();
                match key.strip_prefix("Bearer") {
                    Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
                    _ => key,
                }
            })
            .filter(|key| !key.is_empty() && !is_placeholder(key));

        token.ok_or_else(|| TldwError::MissingCredential {
            provider: self.provider_name.clone(),
        })
    }
}

fn is_placeholder(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    upper.starts_with("YOUR")
        || upper.contains("API-KEY-HERE")
        || upper.contains("API-HERE")
        || upper.contains("API_KEY_HERE")
        || (key.starts_with('<') && key.ends_with('>'))
}

/// First `max_chars` characters of `text`, cut at a char boundary without regard for words.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The chat-completion request body for `transcript`.
pub fn build_request_body(transcript: &str, config: &SummaryConfig) -> serde_json::Value {
    let truncated = truncate_chars(transcript, config.max_chars);
    if truncated.len() < transcript.len() {
        debug!(
            max_chars = config.max_chars,
            dropped_bytes = transcript.len() - truncated.len(),
            "truncated transcript for summary"
        );
    }

    let user_prompt = format!(
        "Summarize the following text to ~{} words:\n\n{}",
        config.word_target, truncated
    );

    serde_json::json!({
        "model": config.model,
        "messages": [
            {
                "role": "system",
                "content": SYSTEM_PROMPT,
            },
            {
                "role": "user",
                "content": user_prompt,
            },
        ],
    })
}

/// Pull the first choice's message content out of a chat-completion response.
pub fn extract_summary(response: &serde_json::Value) -> String {
    response["choices"][0]["message"]["content"]
        .as_str()
        .filter(|content| !content.trim().is_empty())
        .unwrap_or(NO_SUMMARY)
        .to_string()
}

/// Ask the configured chat-completion endpoint to summarize `transcript`.
pub async fn request_summary(
    client: &reqwest::Client,
    transcript: &str,
    config: &SummaryConfig,
) -> Result<String> {
    let api_key = config.bearer_token()?;
    let body = build_request_body(transcript, config);

    let response = client
        .post(&config.endpoint)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .send()
        .await
        .map_err(|e| TldwError::from_reqwest(&config.endpoint, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        return Err(TldwError::SummaryApi {
            status: status.as_u16(),
            body,
        });
    }

    let response = response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| TldwError::from_reqwest(&config.endpoint, e))?;

    Ok(extract_summary(&response))
}
