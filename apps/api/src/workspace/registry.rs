//! Job Description Registry — an ordered, capacity-bounded list of postings
//! with at most one selected entry.

use thiserror::Error;
use tracing::debug;

use crate::models::job::{JobDescription, JobId};

/// Maximum number of job descriptions a workspace may hold.
pub const MAX_JOB_DESCRIPTIONS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("unknown job description: {0}")]
    UnknownJob(String),
}

#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<JobDescription>,
    selected: Option<JobId>,
}

impl JobRegistry {
    /// Appends a new job description with a fresh id.
    ///
    /// Returns `None` without changing anything when the registry is full.
    pub fn add(
        &mut self,
        company: String,
        position: String,
        description: String,
    ) -> Option<&JobDescription> {
        if self.is_full() {
            debug!("Registry full ({MAX_JOB_DESCRIPTIONS}), ignoring add for {company}");
            return None;
        }

        self.jobs.push(JobDescription {
            id: JobId::generate(),
            company,
            position,
            description,
        });
        self.jobs.last()
    }

    /// Removes the entry with `id`, clearing the selection if it pointed at it.
    /// Absent ids are ignored.
    pub fn remove(&mut self, id: &JobId) -> Option<JobDescription> {
        let index = self.jobs.iter().position(|job| &job.id == id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.jobs.remove(index))
    }

    /// Selects the entry with `id`. An empty id clears the selection.
    ///
    /// Unknown ids are rejected and leave the current selection in place, so the
    /// selection always names an existing entry or nothing.
    pub fn select(&mut self, id: &str) -> Result<(), RegistryError> {
        if id.is_empty() {
            self.selected = None;
            return Ok(());
        }

        let job = self
            .jobs
            .iter()
            .find(|job| job.id.as_str() == id)
            .ok_or_else(|| RegistryError::UnknownJob(id.to_string()))?;
        self.selected = Some(job.id.clone());
        Ok(())
    }

    pub fn selected_id(&self) -> Option<&JobId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&JobDescription> {
        let id = self.selected.as_ref()?;
        self.get(id)
    }

    pub fn get(&self, id: &JobId) -> Option<&JobDescription> {
        self.jobs.iter().find(|job| &job.id == id)
    }

    pub fn list(&self) -> &[JobDescription] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_JOB_DESCRIPTIONS
    }
}
