//! Loading agent configuration (prompts + generation settings) from TOML.
//!
//! Every field has a default, so a missing or partial file is fine. See `AgentConfig`,
//! `Prompts` and `GenerationSettings` for the expected schema:
//!
//! ```toml
//! [generation]
//! default_count = 5
//! llm_topic_threshold = 5
//!
//! [prompts]
//! topics_system = "..."
//! ```

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationSettings,
}

/// Request defaults and limits around generation and topic extraction.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
  pub default_count: usize,
  pub max_count: usize,
  pub default_difficulty: String,
  /// Only this many leading chars of a document are sent to the model.
  pub document_char_limit: usize,
  /// Ask the model for more topics when the catalog matcher found fewer than this.
  pub llm_topic_threshold: usize,
  pub generation_temperature: f32,
  pub generation_max_tokens: u32,
  pub topics_temperature: f32,
  pub topics_max_tokens: u32,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    Self {
      default_count: 5,
      max_count: 50,
      default_difficulty: "Bachelor".into(),
      document_char_limit: 8000,
      llm_topic_threshold: 5,
      generation_temperature: 1.0,
      generation_max_tokens: 8192,
      topics_temperature: 0.1,
      topics_max_tokens: 2048,
    }
  }
}

/// Prompts used by the OpenAI client. Placeholders in `{braces}` are filled per request.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Question generation
  pub generation_system: String,
  /// Placeholders: {difficulty}, {topics_json}, {types_json}, {count}
  pub generation_user_template: String,
  /// Appended when a single type is requested. Placeholder: {forced_type}
  pub forced_type_rule: String,
  pub coding_requirements: String,
  // Topic extraction
  pub topics_system: String,
  /// Placeholders: {topics_json}, {document}
  pub topics_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generation_system: "You write technical assessment questions. Respond ONLY with a valid JSON array, no markdown, no commentary.".into(),
      generation_user_template: concat!(
        "Write {count} technical questions at '{difficulty}' difficulty.\n",
        "Topics, one per question, in this exact order: {topics_json}\n",
        "Allowed types: {types_json}\n\n",
        "Rules:\n",
        "1. Every question tests a different concept; when a topic repeats, ask about a different feature of it.\n",
        "2. A topic like 'React and CSS' needs one scenario that combines all of the named tools.\n",
        "3. Scale depth to the difficulty: 'Middle School' is fundamental, 'Veteran' is architecture-level.\n",
        "4. Each 'scenario' MUST start with '(Topic: <assigned topic>)'.\n",
        "5. Each object has: type, scenario, hint, reason, and answer. MCQ adds 'options' (4 strings) and 'correctIndex' (0-based). ",
        "Short Answer may add 'keywords' and 'rubric' (string arrays).\n",
      ).into(),
      forced_type_rule: "Every question MUST have \"type\": \"{forced_type}\".".into(),
      coding_requirements: concat!(
        "For 'Coding' questions:\n",
        "- state the exact function/component to implement and list the variable and parameter names to use; no story, no generic math puzzles unless the topic needs them;\n",
        "- include 'starterCode' (a short stub), 'answer' (the full working solution), ",
        "'requiredTokens' (4-6 strings a correct solution must contain) and 'language' (e.g. python, typescript, sql, bash);\n",
        "- never repeat the same coding requirement twice.\n",
      ).into(),
      topics_system: "You are a topic extraction assistant. Respond ONLY with a JSON array of strings.".into(),
      topics_user_template: concat!(
        "Which of the topics below are discussed in or relevant to the document?\n",
        "Only return topics from the list, spelled and cased exactly as listed.\n\n",
        "AVAILABLE TOPICS:\n{topics_json}\n\n",
        "DOCUMENT TEXT:\n{document}\n",
      ).into(),
    }
  }
}

/// Parse a TOML document into `AgentConfig`.
pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "topicquiz_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "topicquiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "topicquiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg = parse_agent_config("").unwrap();
    assert_eq!(cfg.generation.default_count, 5);
    assert_eq!(cfg.generation.default_difficulty, "Bachelor");
    assert_eq!(cfg.generation.document_char_limit, 8000);
    assert!(cfg.prompts.generation_user_template.contains("{topics_json}"));
  }

  #[test]
  fn partial_tables_keep_remaining_defaults() {
    let cfg = parse_agent_config(
      r#"
        [generation]
        max_count = 10
        default_difficulty = "Veteran"

        [prompts]
        topics_system = "custom"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.generation.max_count, 10);
    assert_eq!(cfg.generation.default_difficulty, "Veteran");
    assert_eq!(cfg.generation.llm_topic_threshold, 5);
    assert_eq!(cfg.prompts.topics_system, "custom");
    assert!(cfg.prompts.topics_user_template.contains("{document}"));
  }

  #[test]
  fn wrong_types_are_rejected() {
    assert!(parse_agent_config("[generation]\ndefault_count = \"five\"").is_err());
  }
}
