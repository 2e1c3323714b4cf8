//! Topic-driven technical quiz backend: catalog topic matching, question generation through an
//! optional OpenAI backend, and deterministic local fallbacks.

pub mod catalog;
pub mod config;
pub mod distributor;
pub mod domain;
pub mod errors;
pub mod fallback;
pub mod logic;
pub mod matcher;
pub mod normalize;
pub mod openai;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;
