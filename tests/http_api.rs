use std::sync::Arc;

use axum::{
  body::{to_bytes, Body},
  http::{header, Method, Request, StatusCode},
  Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use topicquiz_backend::catalog::ALL_TOPICS;
use topicquiz_backend::config::AgentConfig;
use topicquiz_backend::routes::build_router;
use topicquiz_backend::state::AppState;

fn app() -> Router {
  let state = AppState::offline(AgentConfig::default()).expect("offline state");
  build_router(Arc::new(state))
}

async fn call(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let res = app().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = res.status();
  let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, value)
}

#[tokio::test]
async fn root_and_health_respond() {
  let (status, body) = call(Method::GET, "/", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "message": "Backend is running" }));

  let (status, body) = call(Method::GET, "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn catalog_lists_sorted_topics() {
  let (status, body) = call(Method::GET, "/catalog", None).await;
  assert_eq!(status, StatusCode::OK);
  let topics: Vec<String> = serde_json::from_value(body["topics"].clone()).unwrap();
  assert_eq!(topics.len(), ALL_TOPICS.len());
  assert!(topics.windows(2).all(|w| w[0] < w[1]));
  assert!(body["categories"].as_object().unwrap().values().all(|v| v.is_array()));
}

#[tokio::test]
async fn generate_falls_back_to_mcq_offline() {
  let (status, body) = call(
    Method::POST,
    "/generate",
    Some(json!({ "subjects": ["React", "CSS"], "types": ["MCQ"], "count": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let questions = body["questions"].as_array().unwrap();
  assert_eq!(questions.len(), 3);
  for q in questions {
    assert_eq!(q["type"], "MCQ");
    let options = q["options"].as_array().unwrap();
    let ci = q["correctIndex"].as_u64().unwrap() as usize;
    assert!(ci < options.len());
    let scenario = q["scenario"].as_str().unwrap();
    assert!(scenario.starts_with("(Topic: React)") || scenario.starts_with("(Topic: CSS)"));
  }
}

#[tokio::test]
async fn generate_coding_fallback_omits_choice_fields() {
  let (status, body) = call(
    Method::POST,
    "/generate",
    Some(json!({ "subjects": ["Kubernetes"], "types": ["Coding"], "count": 5, "difficulty": "Expert" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let questions = body["questions"].as_array().unwrap();
  assert_eq!(questions.len(), 5);
  for q in questions {
    assert_eq!(q["type"], "Coding");
    assert!(q.get("options").is_none());
    assert!(q.get("correctIndex").is_none());
    assert_eq!(q["language"], "python");
    assert!(q["scenario"].as_str().unwrap().starts_with("(Expert Level | Topic: Kubernetes)"));
  }
}

#[tokio::test]
async fn generate_rejects_blank_subjects() {
  let (status, body) = call(Method::POST, "/generate", Some(json!({ "subjects": ["  "] }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "detail": "subjects must not be empty", "code": 400 }));
}

#[tokio::test]
async fn malformed_bodies_use_error_shape() {
  let (status, body) = call(Method::POST, "/generate", Some(json!({ "count": 3 }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["code"], 422);
  assert!(body["detail"].is_string());
}

#[tokio::test]
async fn extract_topics_matches_aliases() {
  let (status, body) = call(Method::POST, "/extract-topics", Some(json!({ "text": "I use js daily" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "topics": ["JavaScript"] }));
}

#[tokio::test]
async fn extract_topics_rejects_blank_text() {
  let (status, body) = call(Method::POST, "/extract-topics", Some(json!({ "text": " " }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["code"], 422);
}
