//! Local question synthesis used when no generation backend is configured or its output was
//! rejected. Pure and total: given a non-empty topic list it always yields `count` questions.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::distributor::distribute;
use crate::domain::{Question, QuestionBody, QuestionType};
use crate::normalize::shuffle_mcq;
use crate::seeds::{
  FALLBACK_CODING_FLAG, FALLBACK_CODING_HINT, FALLBACK_CODING_LANGUAGE, FALLBACK_CODING_PARAM,
  FALLBACK_CODING_REASON, FALLBACK_MCQ_HINT, FALLBACK_OPTION_SETS, FALLBACK_SCENARIO_TEMPLATES,
};
use crate::util::{fill_template, ident_slug};

/// Build `count` ready-to-serve questions for `topics`.
///
/// `forced == Some(Coding)` yields coding tasks; every other case yields MCQs. Template order
/// is shuffled once per call and assigned cyclically, so slots sharing a topic still get
/// different scenarios.
#[instrument(level = "debug", skip_all, fields(topics = topics.len(), %count, ?forced, %difficulty))]
pub fn synthesize<R, S>(
  rng: &mut R,
  topics: &[S],
  count: usize,
  forced: Option<QuestionType>,
  difficulty: &str,
) -> Vec<Question>
where
  R: Rng + ?Sized,
  S: AsRef<str>,
{
  let labels = distribute(rng, topics, count);
  if labels.is_empty() {
    return Vec::new();
  }

  let mut order: Vec<usize> = (0..FALLBACK_SCENARIO_TEMPLATES.len()).collect();
  order.shuffle(rng);

  let questions: Vec<Question> = labels
    .iter()
    .enumerate()
    .map(|(i, topic)| match forced {
      Some(QuestionType::Coding) => coding_question(topic, i + 1, difficulty),
      _ => {
        let mut q = mcq_question(topic, order[i % order.len()], i / order.len());
        shuffle_mcq(rng, &mut q);
        q
      }
    })
    .collect();

  debug!(target: "generation", produced = questions.len(), "Fallback questions synthesized");
  questions
}

/// MCQ from template `template`; the first option of its paired set is correct.
/// `round` > 0 marks slots past the first pass over the templates.
fn mcq_question(topic: &str, template: usize, round: usize) -> Question {
  let mut scenario = fill_template(FALLBACK_SCENARIO_TEMPLATES[template], &[("topic", topic)]);
  if round > 0 {
    scenario.push_str(&format!(" [variant {}]", round + 1));
  }

  let options: Vec<String> = FALLBACK_OPTION_SETS[template].iter().map(|o| o.to_string()).collect();
  let reason = format!("{} directly addresses the root cause.", options[0]);

  Question {
    scenario,
    body: QuestionBody::Mcq { options, correct_index: Some(0) },
    answer: None,
    hint: Some(FALLBACK_MCQ_HINT.to_string()),
    reason: Some(reason),
  }
}

/// Deterministic coding task for slot `n` (1-based).
fn coding_question(topic: &str, n: usize, difficulty: &str) -> Question {
  let func = format!("process_{}_v{}", ident_slug(topic), n);
  let param = FALLBACK_CODING_PARAM;
  let flag = FALLBACK_CODING_FLAG;

  let scenario = format!(
    "({difficulty} Level | Topic: {topic}) Implement feature variant #{n} by writing a function named `{func}` \
     that takes a parameter `{param}` and returns `True`. \n\nExpected Variables: \n- `{param}`\n- `{flag}`"
  );
  let starter_code = format!("def {func}({param}):\n    # Implement here\n    pass");
  let answer = format!("def {func}({param}):\n    {flag} = True\n    return {flag}");

  Question {
    scenario,
    body: QuestionBody::Coding {
      language: FALLBACK_CODING_LANGUAGE.to_string(),
      starter_code,
      required_tokens: ["def", "return", param, flag].iter().map(|t| t.to_string()).collect(),
    },
    answer: Some(answer),
    hint: Some(FALLBACK_CODING_HINT.to_string()),
    reason: Some(FALLBACK_CODING_REASON.to_string()),
  }
}
