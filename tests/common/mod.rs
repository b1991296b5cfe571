// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use edubase::models::exam::{ExamDefinition, Question};
use edubase::models::report::ReportRecord;
use edubase::models::student::Student;
use edubase::storage::{KvStore, MemoryStore};

pub fn memory_store() -> Arc<dyn KvStore> {
    Arc::new(MemoryStore::new())
}

pub fn question(text: &str, correct: &str) -> Question {
    Question {
        text: text.to_string(),
        option_a: "Option A".to_string(),
        option_b: "Option B".to_string(),
        option_c: "Option C".to_string(),
        option_d: "Option D".to_string(),
        correct: correct.to_string(),
    }
}

/// A paper with one question per entry of `correct_options`.
pub fn exam(
    subject: &str,
    class_name: &str,
    timer: u64,
    correct_options: &[&str],
) -> ExamDefinition {
    ExamDefinition {
        subject: subject.to_string(),
        class_name: class_name.to_string(),
        timer,
        questions: correct_options
            .iter()
            .enumerate()
            .map(|(i, c)| question(&format!("Question {}", i + 1), c))
            .collect(),
    }
}

pub fn student(name: &str, class_name: &str, reg_no: &str) -> Student {
    Student {
        name: name.to_string(),
        class_name: class_name.to_string(),
        reg_no: reg_no.to_string(),
    }
}

pub fn report(name: &str, class_name: &str, reg_no: &str, subject: &str, score: u32) -> ReportRecord {
    ReportRecord {
        name: name.to_string(),
        class_name: class_name.to_string(),
        reg_no: reg_no.to_string(),
        subject: subject.to_string(),
        score,
        correct_count: 0,
        total: 10,
        answered_count: 0,
        date: Utc::now(),
    }
}

/// A unique directory under the system temp dir for file store tests.
pub fn temp_data_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("edubase-test-{}", uuid::Uuid::new_v4()))
}
