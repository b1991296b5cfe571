// src/repo/active.rs

use std::sync::Arc;

use crate::error::AppError;
use crate::models::exam::ExamDefinition;
use crate::models::student::Student;
use crate::storage::KvStore;

use super::keys;

/// The login flow stores the candidate here and the subject picker stores
/// the chosen exam; the session loader reads both back. Cleared on logout
/// and when an attempt ends.
pub struct ActiveContext {
    store: Arc<dyn KvStore>,
}

impl ActiveContext {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn set_student(&self, student: &Student) -> Result<(), AppError> {
        self.store
            .write(keys::CURRENT_STUDENT, &serde_json::to_string(student)?)
    }

    pub fn student(&self) -> Result<Option<Student>, AppError> {
        match self.store.read(keys::CURRENT_STUDENT)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn clear_student(&self) -> Result<(), AppError> {
        self.store.remove(keys::CURRENT_STUDENT)
    }

    pub fn set_exam(&self, exam: &ExamDefinition) -> Result<(), AppError> {
        self.store
            .write(keys::CURRENT_EXAM, &serde_json::to_string(exam)?)
    }

    pub fn exam(&self) -> Result<Option<ExamDefinition>, AppError> {
        match self.store.read(keys::CURRENT_EXAM)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn clear_exam(&self) -> Result<(), AppError> {
        self.store.remove(keys::CURRENT_EXAM)
    }
}
