// src/repo/catalog.rs

use std::sync::Arc;

use crate::error::AppError;
use crate::models::exam::ExamDefinition;
use crate::storage::KvStore;

use super::keys;

/// Subjects offered before the admin customises the list.
const DEFAULT_SUBJECTS: [&str; 9] = [
    "English",
    "Mathematics",
    "Biology",
    "Chemistry",
    "Physics",
    "Economics",
    "Government",
    "Civic Education",
    "Computer Studies",
];

/// Repository over authored exam papers and the subject list.
pub struct ExamCatalog {
    store: Arc<dyn KvStore>,
}

impl ExamCatalog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn subjects(&self) -> Result<Vec<String>, AppError> {
        match self.store.read(keys::SUBJECTS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn add_subject(&self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Subject name must not be empty".to_string(),
            ));
        }

        let mut subjects = self.subjects()?;
        subjects.push(name.to_string());
        self.store
            .write(keys::SUBJECTS, &serde_json::to_string(&subjects)?)
    }

    pub fn exams(&self) -> Result<Vec<ExamDefinition>, AppError> {
        match self.store.read(keys::EXAMS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Saves a paper, replacing any existing one for the same
    /// `(class_name, subject)`.
    pub fn save_exam(&self, exam: ExamDefinition) -> Result<(), AppError> {
        let mut exams = self.exams()?;
        exams.retain(|e| {
            !(e.class_name.eq_ignore_ascii_case(&exam.class_name)
                && e.subject.eq_ignore_ascii_case(&exam.subject))
        });
        tracing::info!("Saved exam {} / {}", exam.class_name, exam.subject);
        exams.push(exam);
        self.store.write(keys::EXAMS, &serde_json::to_string(&exams)?)
    }

    /// Case-insensitive lookup of the paper for a class and subject.
    pub fn find(&self, class_name: &str, subject: &str) -> Result<Option<ExamDefinition>, AppError> {
        Ok(self.exams()?.into_iter().find(|e| {
            e.class_name.eq_ignore_ascii_case(class_name) && e.subject.eq_ignore_ascii_case(subject)
        }))
    }

    /// Distinct subjects that have a paper authored for `class_name`.
    pub fn subjects_for_class(&self, class_name: &str) -> Result<Vec<String>, AppError> {
        let mut subjects: Vec<String> = Vec::new();
        for exam in self.exams()? {
            if exam.class_name.eq_ignore_ascii_case(class_name)
                && !subjects.iter().any(|s| s.eq_ignore_ascii_case(&exam.subject))
            {
                subjects.push(exam.subject.clone());
            }
        }
        Ok(subjects)
    }
}
