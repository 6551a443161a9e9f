use chrono::{DateTime, Utc};

use crate::models::resume::Resume;

/// Holds the current résumé. Text is only ever overwritten, never deleted.
#[derive(Debug, Default)]
pub struct ResumeStore {
    resume: Resume,
}

impl ResumeStore {
    pub fn resume(&self) -> &Resume {
        &self.resume
    }

    pub fn text(&self) -> &str {
        &self.resume.text
    }

    /// Replaces the text and stamps the last-updated time.
    pub fn save(&mut self, text: String) -> DateTime<Utc> {
        self.resume.text = text;
        self.stamp()
    }

    /// Stamps the last-updated time without touching the text.
    pub fn touch(&mut self) -> DateTime<Utc> {
        self.stamp()
    }

    // The wall clock may step backwards; the stored timestamp must not.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamped = match self.resume.last_updated {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        self.resume.last_updated = Some(stamped);
        stamped
    }
}
