use std::sync::Arc;

use crate::queue::Dispatcher;
use crate::repo::{AssessmentRepo, JobRepo, ScoreRepo};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Routes submissions to the worker pool, or scores inline when async
    /// processing is disabled.
    pub dispatcher: Arc<Dispatcher>,
    pub jobs: Arc<dyn JobRepo>,
    pub assessments: Arc<dyn AssessmentRepo>,
    pub scores: Arc<dyn ScoreRepo>,
}
