use std::sync::Arc;

use sqlx::PgPool;

use crate::code_runner::CodeRunner;
use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::transcription::Transcriber;

/// Shared application state injected into all route handlers via Axum extractors.
/// The external gateways sit behind trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: Arc<dyn LanguageModel>,
    pub transcriber: Arc<dyn Transcriber>,
    pub code_runner: Arc<dyn CodeRunner>,
    pub config: Config,
}

#[cfg(test)]
pub mod testing {
    use std::sync::Arc;

    use sqlx::postgres::PgPoolOptions;

    use super::AppState;
    use crate::code_runner::testing::EchoRunner;
    use crate::config::Config;
    use crate::llm_client::LanguageModel;
    use crate::transcription::Transcriber;

    /// State with a lazy pool that never connects unless a handler queries it.
    pub fn test_state(llm: Arc<dyn LanguageModel>, transcriber: Arc<dyn Transcriber>) -> AppState {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .expect("lazy pool from a well-formed URL");
        AppState {
            db,
            llm,
            transcriber,
            code_runner: Arc::new(EchoRunner),
            config,
        }
    }
}
