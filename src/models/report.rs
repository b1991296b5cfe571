// src/models/report.rs

use serde::{Deserialize, Serialize};

/// A graded exam result. Appended to the shared report collection and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub name: String,
    pub class_name: String,
    pub reg_no: String,
    pub subject: String,

    /// Percentage score, 0..=100.
    pub score: u32,
    pub correct_count: usize,
    pub total: usize,
    pub answered_count: usize,

    pub date: chrono::DateTime<chrono::Utc>,
}

impl ReportRecord {
    /// At most one record may exist per `(reg_no, subject, class_name)`,
    /// compared case-insensitively.
    pub fn matches_key(&self, reg_no: &str, subject: &str, class_name: &str) -> bool {
        self.reg_no.eq_ignore_ascii_case(reg_no)
            && self.subject.eq_ignore_ascii_case(subject)
            && self.class_name.eq_ignore_ascii_case(class_name)
    }
}
