//! Cleanup of untrusted generated questions.
//!
//! Pipeline, each step total and idempotent on clean input:
//! 1. scenario dedup (trimmed, lowercased key; first occurrence wins)
//! 2. type enforcement per `TypePolicy`
//! 3. coding field backfill
//! 4. answer-preserving MCQ option shuffle
//!
//! `parse_backend_payload` is strict: a payload that is not a list of question objects is an
//! error, never an empty list. `validate_batch` decides whether a normalized batch is good
//! enough to return or must be replaced by fallback questions.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Question, QuestionBody, QuestionType, RawQuestion, TypePolicy};
use crate::seeds::{
  DEFAULT_CODING_LANGUAGE, DEFAULT_REQUIRED_TOKENS, DEFAULT_STARTER_CODE, MISSING_SOLUTION_MARKER,
};
use crate::util::{normalize_ws, strip_code_fences};

#[derive(Debug, Error)]
pub enum NormalizeError {
  #[error("payload is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
  #[error("expected a JSON array of questions or an object with a `questions` array")]
  NotAList,
  #[error("question #{0} is not a JSON object")]
  NotAnObject(usize),
  #[error("question #{index} is malformed: {source}")]
  Record { index: usize, source: serde_json::Error },
  #[error("question #{0} has an empty scenario")]
  EmptyScenario(usize),
  #[error("expected {expected} questions, got {actual}")]
  CountMismatch { expected: usize, actual: usize },
  #[error("MCQ question #{index} has {found} option(s), need at least 2")]
  TooFewOptions { index: usize, found: usize },
  #[error("MCQ question #{0} repeats an option")]
  DuplicateOptions(usize),
}

/// Anything deduplicated by scenario text.
pub trait HasScenario {
  fn scenario(&self) -> &str;
}

impl HasScenario for RawQuestion {
  fn scenario(&self) -> &str { &self.scenario }
}

impl HasScenario for Question {
  fn scenario(&self) -> &str { &self.scenario }
}

/// Parse a model response into raw records.
/// Accepts a bare array or `{"questions": [...]}`, optionally wrapped in a code fence.
pub fn parse_backend_payload(raw: &str) -> Result<Vec<RawQuestion>, NormalizeError> {
  let content = strip_code_fences(raw);
  let value: Value = serde_json::from_str(&content)?;

  let items = match value {
    Value::Array(items) => items,
    Value::Object(mut map) => match map.remove("questions") {
      Some(Value::Array(items)) => items,
      _ => return Err(NormalizeError::NotAList),
    },
    _ => return Err(NormalizeError::NotAList),
  };

  items
    .into_iter()
    .enumerate()
    .map(|(index, item)| {
      if !item.is_object() {
        return Err(NormalizeError::NotAnObject(index));
      }
      let q: RawQuestion =
        serde_json::from_value(item).map_err(|source| NormalizeError::Record { index, source })?;
      if q.scenario.trim().is_empty() {
        return Err(NormalizeError::EmptyScenario(index));
      }
      Ok(q)
    })
    .collect()
}

/// Keep the first record per trimmed, lowercased scenario, in original order.
pub fn dedupe_by_scenario<T: HasScenario>(items: Vec<T>) -> Vec<T> {
  let mut seen = HashSet::new();
  items
    .into_iter()
    .filter(|q| seen.insert(q.scenario().trim().to_lowercase()))
    .collect()
}

/// Full normalization of raw records under `policy`.
pub fn normalize<R: Rng + ?Sized>(
  rng: &mut R,
  raw: Vec<RawQuestion>,
  policy: &TypePolicy,
) -> Vec<Question> {
  let before = raw.len();
  let unique = dedupe_by_scenario(raw);
  if unique.len() != before {
    debug!(target: "generation", dropped = before - unique.len(), "Dropped duplicate scenarios");
  }

  unique
    .into_iter()
    .map(|r| {
      let kind = resolve_type(rng, r.kind.as_deref(), policy);
      let mut q = into_typed(r, kind);
      shuffle_mcq(rng, &mut q);
      q
    })
    .collect()
}

/// Fixed policy overrides; otherwise keep a determinable allowed type or pick one uniformly.
/// A random pick ignores which fields the record carries, so an untyped record can land on
/// MCQ without options and make `validate_batch` reject the whole batch.
fn resolve_type<R: Rng + ?Sized>(rng: &mut R, declared: Option<&str>, policy: &TypePolicy) -> QuestionType {
  match policy {
    TypePolicy::Fixed(t) => *t,
    TypePolicy::AnyOf(allowed) => declared
      .and_then(QuestionType::parse)
      .filter(|t| allowed.contains(t))
      .or_else(|| allowed.choose(rng).copied())
      .unwrap_or(QuestionType::Mcq),
  }
}

fn into_typed(r: RawQuestion, kind: QuestionType) -> Question {
  let mut answer = r.answer;
  let body = match kind {
    QuestionType::Mcq => {
      let options = r.options.unwrap_or_default();
      let correct_index = clamp_index(r.correct_index, options.len());
      QuestionBody::Mcq { options, correct_index }
    }
    QuestionType::FillInBlank => QuestionBody::FillInBlank {},
    QuestionType::ShortAnswer => QuestionBody::ShortAnswer { keywords: r.keywords, rubric: r.rubric },
    QuestionType::Coding => {
      answer = Some(match answer.as_deref().map(strip_code_fences) {
        Some(code) if !code.is_empty() => code,
        _ => MISSING_SOLUTION_MARKER.to_string(),
      });
      coding_body(r.language, r.starter_code, r.required_tokens)
    }
  };

  Question { scenario: r.scenario, body, answer, hint: r.hint, reason: r.reason }
}

/// Coding fields with defaults for whatever is missing or blank.
fn coding_body(
  language: Option<String>,
  starter_code: Option<String>,
  required_tokens: Option<Vec<String>>,
) -> QuestionBody {
  let language = language
    .map(|l| l.trim().to_lowercase())
    .filter(|l| !l.is_empty())
    .unwrap_or_else(|| DEFAULT_CODING_LANGUAGE.to_string());
  let starter_code = starter_code
    .filter(|s| !s.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_STARTER_CODE.to_string());
  let required_tokens = required_tokens
    .map(|ts| ts.into_iter().filter(|t| !t.trim().is_empty()).collect::<Vec<_>>())
    .filter(|ts| !ts.is_empty())
    .unwrap_or_else(|| DEFAULT_REQUIRED_TOKENS.iter().map(|t| t.to_string()).collect());
  QuestionBody::Coding { language, starter_code, required_tokens }
}

/// Out of range or negative → 0; no options → no index.
fn clamp_index(index: Option<i64>, len: usize) -> Option<usize> {
  if len == 0 {
    return None;
  }
  let i = index.and_then(|i| usize::try_from(i).ok()).filter(|i| *i < len);
  Some(i.unwrap_or(0))
}

/// Shuffle `options` and return the new position of the text at `correct_index`.
/// Only order changes. Fewer than 2 options are left alone.
pub fn shuffle_options<R: Rng + ?Sized>(rng: &mut R, options: &mut [String], correct_index: usize) -> usize {
  if options.len() < 2 {
    return if correct_index < options.len() { correct_index } else { 0 };
  }
  let ci = if correct_index < options.len() { correct_index } else { 0 };
  let correct = options[ci].clone();
  options.shuffle(rng);
  options.iter().position(|o| *o == correct).unwrap_or(0)
}

/// Apply [`shuffle_options`] to an MCQ question; other types pass through.
pub fn shuffle_mcq<R: Rng + ?Sized>(rng: &mut R, q: &mut Question) {
  if let QuestionBody::Mcq { options, correct_index } = &mut q.body {
    if options.len() >= 2 {
      let ci = correct_index.unwrap_or(0);
      *correct_index = Some(shuffle_options(rng, options, ci));
    }
  }
}

/// The label inside a leading "(... Topic: <label>)" tag, if present.
pub fn topic_tag(scenario: &str) -> Option<&str> {
  let rest = scenario.trim_start().strip_prefix('(')?;
  let (inside, _) = rest.split_once(')')?;
  let (_, label) = inside.split_once("Topic:")?;
  let label = label.trim();
  if label.is_empty() { None } else { Some(label) }
}

fn option_key(o: &str) -> String {
  normalize_ws(o).to_lowercase()
}

/// Whether an MCQ repeats an option (whitespace- and case-insensitive, blanks ignored).
pub fn has_internal_duplicate_options(options: &[String]) -> bool {
  let mut seen = HashSet::new();
  options
    .iter()
    .filter(|o| !o.trim().is_empty())
    .any(|o| !seen.insert(option_key(o)))
}

/// Whether two MCQ questions in the batch share the same option set (order-insensitive).
pub fn has_duplicate_option_sets(questions: &[Question]) -> bool {
  let mut seen = HashSet::new();
  questions.iter().filter_map(|q| q.options()).any(|options| {
    let mut keys: Vec<String> = options
      .iter()
      .filter(|o| !o.trim().is_empty())
      .map(|o| option_key(o))
      .collect();
    if keys.is_empty() {
      return false;
    }
    keys.sort();
    !seen.insert(keys.join("|"))
  })
}

/// Accept or reject a normalized backend batch as a whole.
pub fn validate_batch(questions: &[Question], expected: usize) -> Result<(), NormalizeError> {
  if questions.len() != expected {
    return Err(NormalizeError::CountMismatch { expected, actual: questions.len() });
  }
  for (index, q) in questions.iter().enumerate() {
    if let Some(options) = q.options() {
      if options.len() < 2 {
        return Err(NormalizeError::TooFewOptions { index, found: options.len() });
      }
      if has_internal_duplicate_options(options) {
        return Err(NormalizeError::DuplicateOptions(index));
      }
    }
  }

  if has_duplicate_option_sets(questions) {
    warn!(target: "generation", "Two MCQ questions share the same option set");
  }
  let untagged = questions.iter().filter(|q| topic_tag(&q.scenario).is_none()).count();
  if untagged > 0 {
    warn!(target: "generation", untagged, "Generated scenarios without a topic tag");
  }
  Ok(())
}

/// parse → normalize → validate, the whole path for a model response.
pub fn questions_from_backend_payload<R: Rng + ?Sized>(
  rng: &mut R,
  raw: &str,
  policy: &TypePolicy,
  expected: usize,
) -> Result<Vec<Question>, NormalizeError> {
  let records = parse_backend_payload(raw)?;
  let questions = normalize(rng, records, policy);
  validate_batch(&questions, expected)?;
  Ok(questions)
}
