use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// When false, submissions are scored synchronously on the caller's
    /// request instead of going through the worker pool. Same code path
    /// either way.
    pub async_scoring: bool,
    /// Maximum scoring jobs in flight at once.
    pub scoring_workers: usize,
    /// Global rate limit on scoring job starts.
    pub scoring_jobs_per_sec: f64,
    /// Neutral assessment sub-score used when an applicant has no completed
    /// assessment. Policy knob: 50 keeps unassessed pools from being
    /// penalized against assessed ones.
    pub default_assessment_score: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            async_scoring: env_or("ASYNC_SCORING", "true")
                .parse::<bool>()
                .context("ASYNC_SCORING must be true or false")?,
            scoring_workers: env_or("SCORING_WORKERS", "5")
                .parse::<usize>()
                .context("SCORING_WORKERS must be a positive integer")?,
            scoring_jobs_per_sec: env_or("SCORING_JOBS_PER_SEC", "10")
                .parse::<f64>()
                .context("SCORING_JOBS_PER_SEC must be a number")?,
            default_assessment_score: env_or("DEFAULT_ASSESSMENT_SCORE", "50")
                .parse::<f64>()
                .context("DEFAULT_ASSESSMENT_SCORE must be a number")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
