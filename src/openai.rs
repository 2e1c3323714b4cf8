//! Minimal OpenAI client for our use-cases.
//!
//! We only call chat.completions and request plain text; callers parse the text themselves
//! (question batches go through `normalize`, topic lists through `parse_topic_list`).
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short to avoid PII leaks.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::catalog::{is_canonical, ALL_TOPICS};
use crate::config::{GenerationSettings, Prompts};
use crate::domain::{QuestionType, TypePolicy};
use crate::util::{fill_template, strip_code_fences, trunc_for_log, truncate_chars};

/// Large batches take a while on the strong model.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("OpenAI HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("model returned an empty response")]
  Empty,
  #[error("model response is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());

    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
      Ok(c) => c,
      Err(e) => {
        error!(target: "topicquiz_backend", error = %e, "Failed to build HTTP client; OpenAI disabled");
        return None;
      }
    };

    Some(Self { client, api_key, base_url, fast_model, strong_model })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model, user_len = user.len()))]
  async fn chat_plain(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: u32,
  ) -> Result<String, LlmError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens: Some(max_tokens),
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "topicquiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(LlmError::Status { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default().trim().to_string();

    info!(elapsed = ?start.elapsed(), resp_len = text.len(), "Model response received");
    if text.is_empty() {
      return Err(LlmError::Empty);
    }
    Ok(text)
  }

  // --- High-level helpers (domain-specialized) ---

  /// Ask the strong model for a question batch over the slot labels. Returns the raw text;
  /// parsing and validation are the caller's job.
  #[instrument(
    level = "info",
    skip(self, prompts, settings, labels, policy),
    fields(count = labels.len(), %difficulty, model = %self.strong_model)
  )]
  pub async fn generate_questions(
    &self,
    prompts: &Prompts,
    settings: &GenerationSettings,
    labels: &[String],
    policy: &TypePolicy,
    difficulty: &str,
  ) -> Result<String, LlmError> {
    let user = build_generation_prompt(prompts, labels, policy, difficulty);
    let text = self
      .chat_plain(
        &self.strong_model,
        &prompts.generation_system,
        &user,
        settings.generation_temperature,
        settings.generation_max_tokens,
      )
      .await?;
    debug!(target: "generation", preview = %trunc_for_log(&text, 300), "Generation response preview");
    Ok(text)
  }

  /// Ask the fast model which catalog topics a document covers. Only exact canonical
  /// names survive.
  #[instrument(
    level = "info",
    skip(self, prompts, settings, document),
    fields(doc_len = document.len(), model = %self.fast_model)
  )]
  pub async fn extract_topics(
    &self,
    prompts: &Prompts,
    settings: &GenerationSettings,
    document: &str,
  ) -> Result<Vec<String>, LlmError> {
    let topics_json = serde_json::to_string(&*ALL_TOPICS)?;
    let user = fill_template(
      &prompts.topics_user_template,
      &[
        ("topics_json", topics_json.as_str()),
        ("document", truncate_chars(document, settings.document_char_limit)),
      ],
    );
    let text = self
      .chat_plain(
        &self.fast_model,
        &prompts.topics_system,
        &user,
        settings.topics_temperature,
        settings.topics_max_tokens,
      )
      .await?;
    parse_topic_list(&text)
  }
}

/// Fill the generation template for these slots. The topics JSON keeps slot order so the
/// model writes question `i` about `labels[i]`.
pub fn build_generation_prompt(
  prompts: &Prompts,
  labels: &[String],
  policy: &TypePolicy,
  difficulty: &str,
) -> String {
  let topics_json = serde_json::to_string(labels).unwrap_or_else(|_| "[]".into());
  let types_json = serde_json::to_string(&policy.labels()).unwrap_or_else(|_| "[]".into());
  let count = labels.len().to_string();

  let mut prompt = fill_template(
    &prompts.generation_user_template,
    &[
      ("count", count.as_str()),
      ("difficulty", difficulty),
      ("topics_json", topics_json.as_str()),
      ("types_json", types_json.as_str()),
    ],
  );
  if policy.allowed().contains(&QuestionType::Coding) {
    prompt.push('\n');
    prompt.push_str(&prompts.coding_requirements);
  }
  if let Some(forced) = policy.forced() {
    prompt.push('\n');
    prompt.push_str(&fill_template(&prompts.forced_type_rule, &[("forced_type", forced.label())]));
  }
  prompt
}

/// Parse a model topic list (a JSON string array, possibly fenced) and keep canonical names.
pub fn parse_topic_list(text: &str) -> Result<Vec<String>, LlmError> {
  let names: Vec<String> = serde_json::from_str(&strip_code_fences(text))?;
  let (kept, dropped): (Vec<String>, Vec<String>) =
    names.into_iter().partition(|n| is_canonical(n));
  if !dropped.is_empty() {
    debug!(target: "topics", dropped = ?dropped, "Discarded non-catalog topics from model");
  }
  Ok(kept)
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
