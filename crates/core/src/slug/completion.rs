//! Slug generation through an OpenAI-compatible completions endpoint.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;

use super::{SlugError, SlugProvider, normalize_slug};

/// Environment prefix used when none is configured.
pub const DEFAULT_PROVIDER: &str = "SILICONFLOW_";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Global request budget in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    n: u32,
    stop: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// Blocking client for a `/completions` endpoint.
///
/// Credentials come from the process environment: `{provider}API_KEY` is
/// required and `{provider}BASE_URL` optionally overrides the endpoint.
pub struct CompletionSlugProvider {
    agent: Agent,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for CompletionSlugProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSlugProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl CompletionSlugProvider {
    /// Build a provider from environment settings named by `provider`.
    ///
    /// Fails with [`SlugError::MissingApiKey`] when the key variable is unset
    /// or empty.
    pub fn from_env(provider: &str, model: &str) -> Result<Self, SlugError> {
        let key_var = format!("{provider}API_KEY");
        let api_key = env::var(&key_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SlugError::MissingApiKey(key_var))?;

        let base_url = env::var(format!("{provider}BASE_URL"))
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(&base_url, &api_key, model))
    }

    /// Build a provider with explicit settings.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

impl SlugProvider for CompletionSlugProvider {
    fn generate_slug(&self, title: &str) -> Result<String, SlugError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt: build_prompt(title),
            max_tokens: 512,
            temperature: 0.3,
            n: 1,
            stop: ["\n"],
        };

        debug!("Requesting slug for '{}' from {}", title, self.base_url);

        let response = self
            .agent
            .post(&self.completions_url())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(SlugError::HttpResponse { status, body: error_body });
        }

        let parsed: CompletionResponse = body.read_json()?;
        let text = parsed.choices.into_iter().next().ok_or(SlugError::NoChoices)?.text;

        let slug = normalize_slug(&text);
        if slug.is_empty() {
            return Err(SlugError::EmptySlug);
        }
        Ok(slug)
    }
}

fn build_prompt(title: &str) -> String {
    format!(
        "Generate an English URL slug from the following title. \
         The slug must contain only lowercase letters, digits and hyphens; \
         replace any dots (.) in the title with hyphens. \
         An example for \"2.6 信道复用技术\" is 2-6-channel-multiplexing-technology. \
         For this example, your answer should be \"2-6-channel-multiplexing-technology\". \
         Please respond in English only and return **only** the slug without any extra text.\n\n\
         Title: {title}\n\n\
         Slug:"
    )
}
