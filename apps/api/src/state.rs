use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::notify::Notifier;
use crate::render::PdfRenderer;
use crate::report::archive::ReportArchive;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external collaborator is constructed in `main` and passed in here.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: Arc<dyn CompletionClient>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub notifier: Arc<dyn Notifier>,
    pub archive: Arc<dyn ReportArchive>,
    pub config: Config,
}
