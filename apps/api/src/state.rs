use std::sync::Arc;

use crate::config::Config;
use crate::storage::{ClaimStore, NotesStore};
use crate::summary::SummaryService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<dyn ClaimStore>,
    pub notes: Arc<dyn NotesStore>,
    pub summarizer: Arc<SummaryService>,
    pub config: Config,
}
