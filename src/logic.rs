//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Validating generation requests into a `GenerationPlan`
//!   - Generating a question batch (model first, local fallback on any failure)
//!   - Extracting catalog topics from document text (matcher, optionally topped up by the model)

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument, warn};

use crate::config::GenerationSettings;
use crate::distributor::distribute;
use crate::domain::{Question, TypePolicy};
use crate::errors::AppError;
use crate::fallback;
use crate::normalize::questions_from_backend_payload;
use crate::protocol::GenerateIn;
use crate::state::AppState;

/// A generation request after defaults and limits have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
  pub subjects: Vec<String>,
  pub policy: TypePolicy,
  pub count: usize,
  pub difficulty: String,
}

/// Trim and default the request. Fails only when no usable subject is left.
pub fn plan_generation(settings: &GenerationSettings, req: &GenerateIn) -> Result<GenerationPlan, AppError> {
  let subjects: Vec<String> = req
    .subjects
    .iter()
    .map(|s| s.trim())
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect();
  if subjects.is_empty() {
    return Err(AppError::Validation("subjects must not be empty".into()));
  }

  let requested = req.count.map(|c| usize::try_from(c).unwrap_or(0)).unwrap_or(settings.default_count);
  let count = if requested > settings.max_count {
    warn!(target: "generation", requested, max = settings.max_count, "Requested count above limit; clamping");
    settings.max_count
  } else {
    requested
  };

  let policy = req.types.as_deref().map(|t| TypePolicy::from_requested(t)).unwrap_or_default();

  let difficulty = req
    .difficulty
    .as_deref()
    .map(str::trim)
    .filter(|d| !d.is_empty())
    .unwrap_or(settings.default_difficulty.as_str())
    .to_string();

  Ok(GenerationPlan { subjects, policy, count, difficulty })
}

/// Generate a batch for `req` with a fresh entropy-seeded generator.
pub async fn generate_questions(state: &AppState, req: &GenerateIn) -> Result<Vec<Question>, AppError> {
  let mut rng = StdRng::from_entropy();
  generate_questions_with(state, req, &mut rng).await
}

#[instrument(level = "info", skip(state, req, rng), fields(subjects = req.subjects.len(), count = ?req.count))]
pub async fn generate_questions_with<R>(
  state: &AppState,
  req: &GenerateIn,
  rng: &mut R,
) -> Result<Vec<Question>, AppError>
where
  R: Rng + Send + ?Sized,
{
  let plan = plan_generation(&state.settings, req)?;
  if plan.count == 0 {
    return Ok(Vec::new());
  }

  if let Some(oa) = &state.openai {
    let labels = distribute(rng, &plan.subjects, plan.count);
    match oa
      .generate_questions(&state.prompts, &state.settings, &labels, &plan.policy, &plan.difficulty)
      .await
    {
      Ok(text) => match questions_from_backend_payload(rng, &text, &plan.policy, plan.count) {
        Ok(questions) => {
          info!(target: "generation", count = questions.len(), source = "openai", "Questions generated");
          return Ok(questions);
        }
        Err(e) => warn!(target: "generation", error = %e, "Model output rejected; using fallback questions"),
      },
      Err(e) => warn!(target: "generation", error = %e, "OpenAI generation failed; using fallback questions"),
    }
  }

  let questions = fallback::synthesize(rng, &plan.subjects, plan.count, plan.policy.forced(), &plan.difficulty);
  info!(target: "generation", count = questions.len(), source = "fallback", "Questions generated");
  Ok(questions)
}

/// Catalog topics covered by `text`, sorted.
#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn extract_topics(state: &AppState, text: &str) -> Result<Vec<String>, AppError> {
  if text.trim().is_empty() {
    return Err(AppError::Unprocessable("document contains no extractable text".into()));
  }

  let mut topics: BTreeSet<String> =
    state.matcher.match_topics(text).into_iter().map(str::to_string).collect();
  let matched = topics.len();

  if matched < state.settings.llm_topic_threshold {
    if let Some(oa) = &state.openai {
      match oa.extract_topics(&state.prompts, &state.settings, text).await {
        Ok(extra) => topics.extend(extra),
        Err(e) => warn!(target: "topics", error = %e, "OpenAI topic extraction failed; keeping matched topics"),
      }
    }
  }

  info!(target: "topics", matched, total = topics.len(), "Topics extracted");
  Ok(topics.into_iter().collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AgentConfig;
  use crate::domain::QuestionType;
  use crate::normalize::topic_tag;

  fn request(subjects: &[&str]) -> GenerateIn {
    GenerateIn {
      subjects: subjects.iter().map(|s| s.to_string()).collect(),
      types: None,
      count: None,
      difficulty: None,
    }
  }

  fn offline_state() -> AppState {
    AppState::offline(AgentConfig::default()).unwrap()
  }

  #[test]
  fn plan_applies_defaults() {
    let plan = plan_generation(&GenerationSettings::default(), &request(&["  React ", "", "CSS"])).unwrap();
    assert_eq!(plan.subjects, vec!["React", "CSS"]);
    assert_eq!(plan.count, 5);
    assert_eq!(plan.difficulty, "Bachelor");
    assert_eq!(plan.policy, TypePolicy::Fixed(QuestionType::Mcq));
  }

  #[test]
  fn plan_clamps_and_floors_count() {
    let settings = GenerationSettings::default();
    let mut req = request(&["React"]);
    req.count = Some(500);
    assert_eq!(plan_generation(&settings, &req).unwrap().count, settings.max_count);
    req.count = Some(-4);
    assert_eq!(plan_generation(&settings, &req).unwrap().count, 0);
    req.count = Some(0);
    assert_eq!(plan_generation(&settings, &req).unwrap().count, 0);
  }

  #[test]
  fn plan_rejects_blank_subjects() {
    let err = plan_generation(&GenerationSettings::default(), &request(&[" ", ""])).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn plan_keeps_explicit_difficulty_and_types() {
    let mut req = request(&["Go"]);
    req.difficulty = Some(" Veteran ".into());
    req.types = Some(vec!["Coding".into(), "Essay".into()]);
    let plan = plan_generation(&GenerationSettings::default(), &req).unwrap();
    assert_eq!(plan.difficulty, "Veteran");
    assert_eq!(plan.policy.forced(), Some(QuestionType::Coding));
  }

  #[tokio::test]
  async fn offline_generation_uses_fallback() {
    let state = offline_state();
    let mut rng = StdRng::seed_from_u64(3);
    let mut req = request(&["React", "CSS"]);
    req.count = Some(3);
    let qs = generate_questions_with(&state, &req, &mut rng).await.unwrap();
    assert_eq!(qs.len(), 3);
    for q in &qs {
      assert_eq!(q.kind(), QuestionType::Mcq);
      assert!(matches!(topic_tag(&q.scenario), Some("React") | Some("CSS")));
    }
  }

  #[tokio::test]
  async fn zero_count_yields_empty_batch() {
    let state = offline_state();
    let mut req = request(&["React"]);
    req.count = Some(0);
    assert!(generate_questions(&state, &req).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn extraction_matches_aliases_offline() {
    let state = offline_state();
    let topics = extract_topics(&state, "We deploy on k8s and write the UI in js daily.").await.unwrap();
    assert_eq!(topics, vec!["JavaScript".to_string(), "Kubernetes".to_string()]);
  }

  #[tokio::test]
  async fn extraction_rejects_blank_text() {
    let state = offline_state();
    let err = extract_topics(&state, "   \n").await.unwrap_err();
    assert!(matches!(err, AppError::Unprocessable(_)));
  }
}
