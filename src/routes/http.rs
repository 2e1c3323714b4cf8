//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs request parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::errors::{AppError, AppJson};
use crate::logic::{extract_topics, generate_questions};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "debug")]
pub async fn http_root() -> impl IntoResponse { Json(RootOut { message: "Backend is running" }) }

#[instrument(level = "debug")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { status: "ok" }) }

#[instrument(level = "info")]
pub async fn http_catalog() -> impl IntoResponse { Json(CatalogOut::snapshot()) }

#[instrument(level = "info", skip(state, body), fields(subjects = body.subjects.len(), count = ?body.count, difficulty = ?body.difficulty))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  AppJson(body): AppJson<GenerateIn>,
) -> Result<Json<GenerateOut>, AppError> {
  let questions = generate_questions(&state, &body).await?;
  info!(target: "generation", served = questions.len(), "HTTP generate served");
  Ok(Json(GenerateOut { questions }))
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_post_extract_topics(
  State(state): State<Arc<AppState>>,
  AppJson(body): AppJson<ExtractTopicsIn>,
) -> Result<Json<ExtractTopicsOut>, AppError> {
  let topics = extract_topics(&state, &body.text).await?;
  info!(target: "topics", served = topics.len(), "HTTP extract-topics served");
  Ok(Json(ExtractTopicsOut { topics }))
}
