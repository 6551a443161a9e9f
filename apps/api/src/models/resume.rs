use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job::JobId;

/// The user's current résumé. `last_updated` stays `None` until the first save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resume {
    pub text: String,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Output of a completed tailoring request.
///
/// `company` and `position` are copied from the selection at submit time, so
/// removing the job afterwards does not change what is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub text: String,
    pub job_id: JobId,
    pub company: String,
    pub position: String,
    pub backend: String,
    pub generated_at: DateTime<Utc>,
}

impl TailoredResume {
    pub fn title(&self) -> String {
        format!("My Resume for {}", self.company)
    }
}
