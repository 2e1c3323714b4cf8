//! Free text → canonical catalog topics.
//!
//! Two matching tiers, applied to topics and aliases alike:
//! - phrases of at most 3 chars use a case-insensitive word-boundary regex ("js" must not hit "enjoys");
//! - longer phrases use case-insensitive substring containment ("rest" inside "interesting" still hits).
//!
//! Callers rely on the 3-char threshold and on both modes.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use tracing::{debug, instrument};

use crate::catalog::{ALIASES, ALL_TOPICS};

const WORD_BOUNDARY_MAX_CHARS: usize = 3;

enum Needle {
  Word(Regex),
  Substring(String),
}

impl Needle {
  fn build(phrase: &str) -> Result<Self, regex::Error> {
    if phrase.chars().count() <= WORD_BOUNDARY_MAX_CHARS {
      let re = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
        .case_insensitive(true)
        .build()?;
      Ok(Needle::Word(re))
    } else {
      Ok(Needle::Substring(phrase.to_lowercase()))
    }
  }

  fn hits(&self, text: &str, text_lower: &str) -> bool {
    match self {
      Needle::Word(re) => re.is_match(text),
      Needle::Substring(s) => text_lower.contains(s.as_str()),
    }
  }
}

/// Precompiled matcher over the static catalog. Built once at startup, shared read-only.
pub struct TopicMatcher {
  rules: Vec<(Needle, &'static str)>,
}

impl TopicMatcher {
  pub fn from_catalog() -> Result<Self, regex::Error> {
    let topics = ALL_TOPICS.iter().map(|t| (*t, *t));
    let aliases = ALIASES.iter().copied();

    let rules = topics
      .chain(aliases)
      .map(|(phrase, canonical)| Needle::build(phrase).map(|n| (n, canonical)))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { rules })
  }

  /// Sorted set of canonical topics mentioned in `text`. Empty means "nothing recognizable".
  #[instrument(level = "debug", skip(self, text), fields(text_len = text.len()))]
  pub fn match_topics(&self, text: &str) -> Vec<&'static str> {
    let text_lower = text.to_lowercase();
    let matched: BTreeSet<&'static str> = self
      .rules
      .iter()
      .filter(|(needle, _)| needle.hits(text, &text_lower))
      .map(|(_, canonical)| *canonical)
      .collect();

    debug!(target: "topics", matched = matched.len(), "Catalog match finished");
    matched.into_iter().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matcher() -> TopicMatcher {
    TopicMatcher::from_catalog().expect("catalog patterns compile")
  }

  #[test]
  fn short_alias_matches_as_a_whole_word() {
    let m = matcher();
    assert!(m.match_topics("I use js daily").contains(&"JavaScript"));
    assert!(m.match_topics("We deploy on K8S.").contains(&"Kubernetes"));
  }

  #[test]
  fn short_alias_does_not_match_inside_longer_words() {
    let m = matcher();
    assert!(!m.match_topics("enjoys coding").contains(&"JavaScript"));
  }

  #[test]
  fn short_topic_uses_word_boundary_case_insensitively() {
    let m = matcher();
    assert!(m.match_topics("we terminate tls at the edge").contains(&"TLS"));
    let mtls = m.match_topics("all service calls use mTLS");
    assert!(mtls.contains(&"mTLS"));
    assert!(!mtls.contains(&"TLS"));
  }

  #[test]
  fn long_phrases_match_as_substrings() {
    let m = matcher();
    // Known heuristic: 4+ char phrases match inside unrelated words.
    assert!(m.match_topics("an interesting read").contains(&"REST"));
    assert!(!m.match_topics("a long discussion").contains(&"CSS"));
    assert!(m.match_topics("Our SERVICE WORKERS cache assets").contains(&"Service Workers"));
  }

  #[test]
  fn aliases_resolve_to_canonical_names() {
    let m = matcher();
    let found = m.match_topics("Postgres behind a load balancer, with deep learning models");
    assert!(found.contains(&"PostgreSQL"));
    assert!(found.contains(&"Load Balancing"));
    assert!(found.contains(&"Model Training"));
  }

  #[test]
  fn output_is_sorted_unique_and_canonical() {
    let m = matcher();
    let found = m.match_topics("React, reactjs, react.js and Docker containers with Redis cache");
    let mut sorted = found.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(found, sorted);
    assert!(found.iter().all(|t| crate::catalog::is_canonical(t)));
    assert_eq!(found.iter().filter(|t| **t == "React").count(), 1);
  }

  #[test]
  fn unrelated_text_yields_empty_set() {
    let m = matcher();
    assert!(m.match_topics("").is_empty());
    assert!(m.match_topics("the quick brown fox").is_empty());
  }
}
