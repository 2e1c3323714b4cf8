//! Domain models: question types, the typed question record handed to clients, the loose
//! record shape accepted from a generation backend, and the requested-type policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire labels are the exact strings clients send and receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
  #[serde(rename = "MCQ")]
  Mcq,
  #[serde(rename = "Fill in the Blanks")]
  FillInBlank,
  #[serde(rename = "Short Answer")]
  ShortAnswer,
  #[serde(rename = "Coding")]
  Coding,
}

impl QuestionType {
  pub const ALL: [QuestionType; 4] = [
    QuestionType::Mcq,
    QuestionType::FillInBlank,
    QuestionType::ShortAnswer,
    QuestionType::Coding,
  ];

  pub fn label(self) -> &'static str {
    match self {
      QuestionType::Mcq => "MCQ",
      QuestionType::FillInBlank => "Fill in the Blanks",
      QuestionType::ShortAnswer => "Short Answer",
      QuestionType::Coding => "Coding",
    }
  }

  /// Lenient label parsing: exact labels plus common case/spacing variants.
  pub fn parse(s: &str) -> Option<Self> {
    let key: String = s
      .chars()
      .filter(|c| c.is_ascii_alphanumeric())
      .collect::<String>()
      .to_ascii_lowercase();
    match key.as_str() {
      "mcq" | "multiplechoice" => Some(QuestionType::Mcq),
      "fillintheblanks" | "fillintheblank" | "fillinblank" | "fillinblanks" => Some(QuestionType::FillInBlank),
      "shortanswer" => Some(QuestionType::ShortAnswer),
      "coding" | "code" => Some(QuestionType::Coding),
      _ => None,
    }
  }
}

impl fmt::Display for QuestionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Type-specific part of a question, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum QuestionBody {
  #[serde(rename = "MCQ", rename_all = "camelCase")]
  Mcq {
    options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_index: Option<usize>,
  },
  #[serde(rename = "Fill in the Blanks")]
  FillInBlank {},
  #[serde(rename = "Short Answer")]
  ShortAnswer {
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rubric: Option<Vec<String>>,
  },
  #[serde(rename = "Coding", rename_all = "camelCase")]
  Coding {
    language: String,
    starter_code: String,
    required_tokens: Vec<String>,
  },
}

impl QuestionBody {
  pub fn kind(&self) -> QuestionType {
    match self {
      QuestionBody::Mcq { .. } => QuestionType::Mcq,
      QuestionBody::FillInBlank {} => QuestionType::FillInBlank,
      QuestionBody::ShortAnswer { .. } => QuestionType::ShortAnswer,
      QuestionBody::Coding { .. } => QuestionType::Coding,
    }
  }
}

/// A normalized question as returned to clients. Never mutated after leaving the core.
///
/// Serializes flat: `{"type": "MCQ", "scenario": "...", "options": [...], "correctIndex": 1, ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
  pub scenario: String,
  #[serde(flatten)]
  pub body: QuestionBody,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub answer: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

impl Question {
  pub fn kind(&self) -> QuestionType {
    self.body.kind()
  }

  /// Options of an MCQ question, `None` for every other type.
  pub fn options(&self) -> Option<&[String]> {
    match &self.body {
      QuestionBody::Mcq { options, .. } => Some(options.as_slice()),
      _ => None,
    }
  }

  pub fn correct_index(&self) -> Option<usize> {
    match &self.body {
      QuestionBody::Mcq { correct_index, .. } => *correct_index,
      _ => None,
    }
  }
}

/// Untrusted record shape from a generation backend. Only `scenario` is required;
/// every other field is optional and may be wrong for the eventual type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub scenario: String,
  pub options: Option<Vec<String>>,
  pub correct_index: Option<i64>,
  pub answer: Option<String>,
  pub hint: Option<String>,
  pub reason: Option<String>,
  pub keywords: Option<Vec<String>>,
  pub rubric: Option<Vec<String>>,
  pub language: Option<String>,
  pub starter_code: Option<String>,
  pub required_tokens: Option<Vec<String>>,
}

impl From<&Question> for RawQuestion {
  fn from(q: &Question) -> Self {
    let mut raw = RawQuestion {
      kind: Some(q.kind().label().to_string()),
      scenario: q.scenario.clone(),
      answer: q.answer.clone(),
      hint: q.hint.clone(),
      reason: q.reason.clone(),
      ..RawQuestion::default()
    };
    match &q.body {
      QuestionBody::Mcq { options, correct_index } => {
        raw.options = Some(options.clone());
        raw.correct_index = correct_index.map(|i| i as i64);
      }
      QuestionBody::FillInBlank {} => {}
      QuestionBody::ShortAnswer { keywords, rubric } => {
        raw.keywords = keywords.clone();
        raw.rubric = rubric.clone();
      }
      QuestionBody::Coding { language, starter_code, required_tokens } => {
        raw.language = Some(language.clone());
        raw.starter_code = Some(starter_code.clone());
        raw.required_tokens = Some(required_tokens.clone());
      }
    }
    raw
  }
}

/// Which types a request allows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypePolicy {
  /// Exactly one type requested: every question gets it.
  Fixed(QuestionType),
  /// Several types requested: keep a record's own type if allowed, else pick one at random.
  AnyOf(Vec<QuestionType>),
}

impl Default for TypePolicy {
  fn default() -> Self { TypePolicy::Fixed(QuestionType::Mcq) }
}

impl TypePolicy {
  /// Unknown labels are dropped; nothing valid left means MCQ only.
  pub fn from_requested<S: AsRef<str>>(requested: &[S]) -> Self {
    let mut allowed: Vec<QuestionType> = Vec::new();
    for t in requested.iter().filter_map(|s| QuestionType::parse(s.as_ref())) {
      if !allowed.contains(&t) {
        allowed.push(t);
      }
    }
    match allowed.len() {
      0 => TypePolicy::default(),
      1 => TypePolicy::Fixed(allowed[0]),
      _ => TypePolicy::AnyOf(allowed),
    }
  }

  /// The single forced type, if any.
  pub fn forced(&self) -> Option<QuestionType> {
    match self {
      TypePolicy::Fixed(t) => Some(*t),
      TypePolicy::AnyOf(_) => None,
    }
  }

  pub fn allowed(&self) -> &[QuestionType] {
    match self {
      TypePolicy::Fixed(t) => std::slice::from_ref(t),
      TypePolicy::AnyOf(ts) => ts,
    }
  }

  pub fn labels(&self) -> Vec<&'static str> {
    self.allowed().iter().map(|t| t.label()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn question_type_parse_accepts_labels_and_variants() {
    for t in QuestionType::ALL {
      assert_eq!(QuestionType::parse(t.label()), Some(t));
    }
    assert_eq!(QuestionType::parse("mcq"), Some(QuestionType::Mcq));
    assert_eq!(QuestionType::parse("fill in the blank"), Some(QuestionType::FillInBlank));
    assert_eq!(QuestionType::parse("short_answer"), Some(QuestionType::ShortAnswer));
    assert_eq!(QuestionType::parse("Essay"), None);
    assert_eq!(QuestionType::parse(""), None);
  }

  #[test]
  fn policy_drops_invalid_and_deduplicates() {
    assert_eq!(TypePolicy::from_requested(&["Essay", "Poem"]), TypePolicy::Fixed(QuestionType::Mcq));
    let none: [&str; 0] = [];
    assert_eq!(TypePolicy::from_requested(&none), TypePolicy::Fixed(QuestionType::Mcq));
    assert_eq!(
      TypePolicy::from_requested(&["Coding", "coding", "Essay"]),
      TypePolicy::Fixed(QuestionType::Coding)
    );
    let any = TypePolicy::from_requested(&["MCQ", "Short Answer"]);
    assert_eq!(any.forced(), None);
    assert_eq!(any.labels(), vec!["MCQ", "Short Answer"]);
  }

  #[test]
  fn mcq_serializes_flat_with_camel_case() {
    let q = Question {
      scenario: "(Topic: Redis) Pick one".into(),
      body: QuestionBody::Mcq { options: vec!["a".into(), "b".into()], correct_index: Some(1) },
      answer: None,
      hint: Some("think".into()),
      reason: None,
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(
      v,
      json!({
        "type": "MCQ",
        "scenario": "(Topic: Redis) Pick one",
        "options": ["a", "b"],
        "correctIndex": 1,
        "hint": "think"
      })
    );
  }

  #[test]
  fn coding_serializes_without_choice_fields() {
    let q = Question {
      scenario: "Implement f".into(),
      body: QuestionBody::Coding {
        language: "python".into(),
        starter_code: "def f():\n    pass".into(),
        required_tokens: vec!["def".into()],
      },
      answer: Some("def f():\n    return 1".into()),
      hint: None,
      reason: None,
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["type"], "Coding");
    assert_eq!(v["starterCode"], "def f():\n    pass");
    assert_eq!(v["requiredTokens"], json!(["def"]));
    assert!(v.get("options").is_none());
    assert!(v.get("correctIndex").is_none());
  }

  #[test]
  fn raw_question_requires_scenario_only() {
    let raw: RawQuestion = serde_json::from_value(json!({
      "scenario": "s",
      "type": "MCQ",
      "correctIndex": -3,
      "starterCode": null
    }))
    .unwrap();
    assert_eq!(raw.kind.as_deref(), Some("MCQ"));
    assert_eq!(raw.correct_index, Some(-3));
    assert_eq!(raw.starter_code, None);

    assert!(serde_json::from_value::<RawQuestion>(json!({ "type": "MCQ" })).is_err());
    assert!(serde_json::from_value::<RawQuestion>(json!({ "scenario": 42 })).is_err());
  }
}
