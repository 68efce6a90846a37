use std::sync::Arc;

use lingo_genai::generator::QuestionGenerator;

use crate::config::{PracticeConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lingo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Practice-engine tunables.
    pub practice: Arc<PracticeConfig>,
    /// Question generator backing inventory top-ups. A trait object so
    /// tests can script it in process.
    pub generator: Arc<dyn QuestionGenerator>,
}
