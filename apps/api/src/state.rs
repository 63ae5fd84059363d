use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis holds the transient intake snapshot between upload and session start.
    pub redis: RedisClient,
    /// The provider client is constructed once in `main` and injected here,
    /// behind a trait so tests can stub completions.
    pub llm: Arc<dyn CompletionProvider>,
    #[allow(dead_code)]
    pub config: Config,
}
