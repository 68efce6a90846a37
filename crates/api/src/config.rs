use lingo_core::progression::ProgressionPolicy;
use lingo_core::ranking::DEFAULT_MIN_HISTORY_FOR_RANKING;
use lingo_core::selection::DEFAULT_CANDIDATE_WINDOW;

use crate::inventory::MAX_GENERATION_PER_CALL;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`). Bounds the
    /// post-shutdown pool drain.
    pub shutdown_timeout_secs: u64,
    /// Base URL of the question-generation service.
    pub genai_base_url: String,
    /// Timeout for one generation call, in seconds (default: `30`).
    pub genai_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `GENAI_BASE_URL`       | `http://localhost:8089`    |
    /// | `GENAI_TIMEOUT_SECS`   | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let genai_base_url =
            std::env::var("GENAI_BASE_URL").unwrap_or_else(|_| "http://localhost:8089".into());

        let genai_timeout_secs: u64 = std::env::var("GENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("GENAI_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            genai_base_url,
            genai_timeout_secs,
        }
    }
}

/// Tunables of the adaptive practice engine, loaded from environment
/// variables once at startup.
///
/// Invalid combinations (a demotion threshold a promotion streak could
/// never beat, a zero free-session limit) panic at boot rather than
/// surface mid-session.
#[derive(Debug, Clone, Copy)]
pub struct PracticeConfig {
    /// Promotion/demotion thresholds for the level state machine.
    pub policy: ProgressionPolicy,
    /// Free sessions per user before the gate closes (premium is exempt).
    pub free_session_limit: i32,
    /// Graded attempts required before weak-skill ranking kicks in;
    /// below it the session order is a uniform shuffle.
    pub min_history_for_ranking: i64,
    /// Trailing window, in days, for the ranking score aggregates.
    pub ranking_window_days: i32,
    /// Trailing window, in days, for the repeat-exclusion set.
    pub exclusion_window_days: i32,
    /// Cap on the repeat-exclusion set per skill area.
    pub exclusion_max_attempts: i64,
    /// Newest-first candidate window a question is drawn from.
    pub candidate_window: i64,
    /// Per-key stock floor under which a top-up is triggered.
    pub inventory_min_count: i64,
    /// Questions requested per top-up.
    pub inventory_topup_count: i64,
}

impl PracticeConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `PROMOTION_STREAK`        | `3`     |
    /// | `DEMOTION_ATTEMPTS`       | `5`     |
    /// | `FREE_SESSION_LIMIT`      | `10`    |
    /// | `MIN_HISTORY_FOR_RANKING` | `4`     |
    /// | `RANKING_WINDOW_DAYS`     | `30`    |
    /// | `EXCLUSION_WINDOW_DAYS`   | `7`     |
    /// | `EXCLUSION_MAX_ATTEMPTS`  | `20`    |
    /// | `CANDIDATE_WINDOW`        | `10`    |
    /// | `INVENTORY_MIN_COUNT`     | `5`     |
    /// | `INVENTORY_TOPUP_COUNT`   | `10`    |
    pub fn from_env() -> Self {
        let promotion_streak: i32 = std::env::var("PROMOTION_STREAK")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("PROMOTION_STREAK must be a valid i32");

        let demotion_attempts: i32 = std::env::var("DEMOTION_ATTEMPTS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DEMOTION_ATTEMPTS must be a valid i32");

        let policy = ProgressionPolicy::new(promotion_streak, demotion_attempts)
            .unwrap_or_else(|e| panic!("Invalid progression thresholds: {e}"));

        let free_session_limit: i32 = std::env::var("FREE_SESSION_LIMIT")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("FREE_SESSION_LIMIT must be a valid i32");
        assert!(
            free_session_limit >= 1,
            "FREE_SESSION_LIMIT must be at least 1, got {free_session_limit}"
        );

        let min_history_for_ranking: i64 = std::env::var("MIN_HISTORY_FOR_RANKING")
            .unwrap_or_else(|_| DEFAULT_MIN_HISTORY_FOR_RANKING.to_string())
            .parse()
            .expect("MIN_HISTORY_FOR_RANKING must be a valid i64");

        let ranking_window_days: i32 = std::env::var("RANKING_WINDOW_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("RANKING_WINDOW_DAYS must be a valid i32");

        let exclusion_window_days: i32 = std::env::var("EXCLUSION_WINDOW_DAYS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .expect("EXCLUSION_WINDOW_DAYS must be a valid i32");

        let exclusion_max_attempts: i64 = std::env::var("EXCLUSION_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("EXCLUSION_MAX_ATTEMPTS must be a valid i64");

        let candidate_window: i64 = std::env::var("CANDIDATE_WINDOW")
            .unwrap_or_else(|_| DEFAULT_CANDIDATE_WINDOW.to_string())
            .parse()
            .expect("CANDIDATE_WINDOW must be a valid i64");
        assert!(
            candidate_window >= 1,
            "CANDIDATE_WINDOW must be at least 1, got {candidate_window}"
        );

        let inventory_min_count: i64 = std::env::var("INVENTORY_MIN_COUNT")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("INVENTORY_MIN_COUNT must be a valid i64");

        let inventory_topup_count: i64 = std::env::var("INVENTORY_TOPUP_COUNT")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("INVENTORY_TOPUP_COUNT must be a valid i64");
        assert!(
            inventory_topup_count >= 1,
            "INVENTORY_TOPUP_COUNT must be at least 1, got {inventory_topup_count}"
        );

        Self {
            policy,
            free_session_limit,
            min_history_for_ranking,
            ranking_window_days,
            exclusion_window_days,
            exclusion_max_attempts,
            candidate_window,
            inventory_min_count,
            inventory_topup_count: inventory_topup_count.min(MAX_GENERATION_PER_CALL),
        }
    }
}

impl Default for PracticeConfig {
    /// The same values [`PracticeConfig::from_env`] falls back to.
    fn default() -> Self {
        Self {
            policy: ProgressionPolicy::default(),
            free_session_limit: 10,
            min_history_for_ranking: DEFAULT_MIN_HISTORY_FOR_RANKING,
            ranking_window_days: 30,
            exclusion_window_days: 7,
            exclusion_max_attempts: 20,
            candidate_window: DEFAULT_CANDIDATE_WINDOW,
            inventory_min_count: 5,
            inventory_topup_count: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
