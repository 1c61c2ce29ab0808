mod ai_client;
mod config;
mod cv;
mod db;
mod errors;
mod models;
mod queue;
mod repo;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::AnthropicClient;
use crate::config::Config;
use crate::cv::HttpPdfExtractor;
use crate::db::create_pool;
use crate::queue::worker::WorkerPool;
use crate::queue::{Dispatcher, InMemoryQueue, LoggingEventSink, ScoringQueue};
use crate::repo::pg::{PgApplicantRepo, PgAssessmentRepo, PgJobRepo, PgScoreRepo};
use crate::routes::build_router;
use crate::scoring::analysis::CvAnalyzer;
use crate::scoring::orchestrator::ScoringService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scoring API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the per-entity repositories
    let pool = create_pool(&config.database_url).await?;
    let applicants = Arc::new(PgApplicantRepo::new(pool.clone()));
    let jobs = Arc::new(PgJobRepo::new(pool.clone()));
    let assessments = Arc::new(PgAssessmentRepo::new(pool.clone()));
    let scores = Arc::new(PgScoreRepo::new(pool.clone()));

    // AI analysis client
    let analyzer = CvAnalyzer::new(Arc::new(AnthropicClient::new(
        config.anthropic_api_key.clone(),
    )));
    info!("AI client initialized (model: {})", ai_client::MODEL);

    // The orchestrator every scoring path runs through
    let service = Arc::new(ScoringService::new(
        applicants,
        jobs.clone(),
        assessments.clone(),
        scores.clone(),
        analyzer,
        Arc::new(HttpPdfExtractor::new()),
        config.default_assessment_score,
    ));

    let events = Arc::new(LoggingEventSink);

    // Worker pool behind the queue, unless async scoring is disabled — then
    // the dispatcher runs the identical path inline on the request.
    let scoring_queue: Option<Arc<dyn ScoringQueue>> = if config.async_scoring {
        let (queue, rx) = InMemoryQueue::channel();
        WorkerPool::new(
            service.clone(),
            events.clone(),
            config.scoring_workers,
            config.scoring_jobs_per_sec,
        )
        .spawn(rx);
        info!(
            "Scoring worker pool: {} workers, {} jobs/sec",
            config.scoring_workers, config.scoring_jobs_per_sec
        );
        Some(Arc::new(queue))
    } else {
        info!("Async scoring disabled; submissions are scored inline");
        None
    };

    let dispatcher = Arc::new(Dispatcher::new(service, scoring_queue, events));

    let state = AppState {
        dispatcher,
        jobs,
        assessments,
        scores,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
