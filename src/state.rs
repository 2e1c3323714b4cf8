//! Application state: prompts, generation settings, the topic matcher, and the optional
//! OpenAI client. Everything is read-only after startup; handlers share it via `Arc`.

use tracing::{info, instrument};

use crate::catalog::{self, ALIASES, ALL_TOPICS, CATALOG};
use crate::config::{load_agent_config_from_env, AgentConfig, GenerationSettings, Prompts};
use crate::errors::AppError;
use crate::matcher::TopicMatcher;
use crate::openai::OpenAI;

pub struct AppState {
    pub prompts: Prompts,
    pub settings: GenerationSettings,
    pub matcher: TopicMatcher,
    pub openai: Option<OpenAI>,
}

impl AppState {
    /// Build state from env: load config, check the catalog, compile the matcher, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, AppError> {
        let cfg = load_agent_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "topicquiz_backend", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "OpenAI enabled.");
        } else {
            info!(target: "topicquiz_backend", "OpenAI disabled (no OPENAI_API_KEY). Using catalog matching and fallback questions.");
        }

        Self::with_client(cfg, openai)
    }

    /// State without a model client, used by tests and offline runs.
    pub fn offline(cfg: AgentConfig) -> Result<Self, AppError> {
        Self::with_client(cfg, None)
    }

    fn with_client(cfg: AgentConfig, openai: Option<OpenAI>) -> Result<Self, AppError> {
        catalog::validate()?;
        let matcher = TopicMatcher::from_catalog()?;

        info!(
            target: "topicquiz_backend",
            categories = CATALOG.len(),
            topics = ALL_TOPICS.len(),
            aliases = ALIASES.len(),
            default_count = cfg.generation.default_count,
            max_count = cfg.generation.max_count,
            "Startup topic inventory"
        );

        Ok(Self {
            prompts: cfg.prompts,
            settings: cfg.generation,
            matcher,
            openai,
        })
    }
}
