use std::sync::Arc;

use crate::tailoring::orchestrator::Orchestrator;
use crate::tailoring::tailor::Tailor;
use crate::workspace::{self, SharedWorkspace, Workspace};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub workspace: SharedWorkspace,
    /// Runs tailoring requests against the same workspace.
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(workspace: Workspace, tailor: Arc<dyn Tailor>) -> Self {
        let workspace = workspace::shared(workspace);
        let orchestrator = Orchestrator::new(Arc::clone(&workspace), tailor);
        Self {
            workspace,
            orchestrator,
        }
    }
}
