use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a job description. Generated from a UUIDv7, so ids created
/// later sort after ids created earlier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: JobId,
    pub company: String,
    pub position: String,
    pub description: String,
}

impl JobDescription {
    /// "Company - Position", as shown next to the selection control.
    pub fn label(&self) -> String {
        format!("{} - {}", self.company, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_ordered() {
        let ids: Vec<JobId> = (0..50).map(|_| JobId::generate()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn test_job_id_serializes_as_plain_string() {
        let id = JobId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }

    #[test]
    fn test_label_joins_company_and_position() {
        let job = JobDescription {
            id: JobId::from("1"),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            description: "D".to_string(),
        };
        assert_eq!(job.label(), "Acme - Engineer");
    }
}
