// The user's workspace: résumé, job descriptions, selection, credential, and
// the tailoring state. One instance per process, shared behind a mutex.

pub mod credential;
pub mod handlers;
pub mod registry;
pub mod resume;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::tailoring::orchestrator::{TailoringState, TailoringStatus};
use credential::CredentialHolder;
use registry::JobRegistry;
use resume::ResumeStore;

pub type SharedWorkspace = Arc<Mutex<Workspace>>;

pub struct Workspace {
    pub resume: ResumeStore,
    pub registry: JobRegistry,
    pub credential: CredentialHolder,
    pub tailoring: TailoringState,
}

impl Workspace {
    pub fn new(credential_path: impl Into<PathBuf>) -> Self {
        Self {
            resume: ResumeStore::default(),
            registry: JobRegistry::default(),
            credential: CredentialHolder::new(credential_path),
            tailoring: TailoringState::default(),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.tailoring.is_busy() && self.registry.selected().is_some()
    }

    pub fn tailoring_status(&self) -> TailoringStatus {
        TailoringStatus::new(&self.tailoring, self.registry.selected().is_some())
    }
}

pub fn shared(workspace: Workspace) -> SharedWorkspace {
    Arc::new(Mutex::new(workspace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit_requires_selection() {
        let mut ws = Workspace::new("unused");
        assert!(!ws.can_submit());

        let id = ws
            .registry
            .add("Acme".to_string(), "Engineer".to_string(), "D".to_string())
            .map(|job| job.id.clone())
            .unwrap();
        ws.registry.select(id.as_str()).unwrap();
        assert!(ws.can_submit());
        assert_eq!(ws.can_submit(), ws.tailoring_status().can_submit);
    }
}
