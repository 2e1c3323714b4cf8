//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{ALL_TOPICS, CATALOG};
use crate::domain::Question;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateIn {
  pub subjects: Vec<String>,
  #[serde(default)]
  pub types: Option<Vec<String>>,
  /// Signed so a negative count reaches validation instead of failing deserialization.
  #[serde(default)]
  pub count: Option<i64>,
  #[serde(default)]
  pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateOut {
  pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractTopicsIn {
  pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractTopicsOut {
  pub topics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RootOut {
  pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
  pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogOut {
  pub categories: BTreeMap<&'static str, Vec<&'static str>>,
  pub topics: Vec<&'static str>,
}

impl CatalogOut {
  pub fn snapshot() -> Self {
    let categories = CATALOG.iter().map(|(name, topics)| (*name, topics.to_vec())).collect();
    Self { categories, topics: ALL_TOPICS.to_vec() }
  }
}
