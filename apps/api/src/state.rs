use crate::config::Config;
use crate::extraction::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Extraction pipeline wired to the generation service and the PDF loader.
    pub pipeline: Pipeline,
    pub config: Config,
}
