// src/repo/roster.rs

use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{Datelike, Utc};
use validator::Validate;

use crate::error::AppError;
use crate::models::student::{CreateStudentRequest, Student};
use crate::storage::KvStore;

use super::keys;

/// Repository over the student roster.
pub struct StudentRoster {
    store: Arc<dyn KvStore>,
}

impl StudentRoster {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Result<Vec<Student>, AppError> {
        match self.store.read(keys::STUDENTS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&self, students: &[Student]) -> Result<(), AppError> {
        let raw = serde_json::to_string(students)?;
        self.store.write(keys::STUDENTS, &raw)
    }

    /// Adds a student, generating a fresh `EDU-<year>-<nnnn>` registration
    /// number that no other roster entry uses.
    pub fn add(&self, req: CreateStudentRequest) -> Result<Student, AppError> {
        if let Err(validation_errors) = req.validate() {
            return Err(AppError::BadRequest(validation_errors.to_string()));
        }

        let mut students = self.all()?;
        let reg_no = generate_reg_no(&students);
        let student = Student {
            name: req.name.trim().to_string(),
            class_name: req.class_name.trim().to_string(),
            reg_no,
        };
        students.push(student.clone());
        self.write_all(&students)?;
        tracing::info!("Added student {} ({})", student.name, student.reg_no);
        Ok(student)
    }

    /// Updates name and class for the student with `reg_no`.
    pub fn update(&self, reg_no: &str, req: CreateStudentRequest) -> Result<Student, AppError> {
        if let Err(validation_errors) = req.validate() {
            return Err(AppError::BadRequest(validation_errors.to_string()));
        }

        let mut students = self.all()?;
        let student = students
            .iter_mut()
            .find(|s| s.reg_no.eq_ignore_ascii_case(reg_no))
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", reg_no)))?;
        student.name = req.name.trim().to_string();
        student.class_name = req.class_name.trim().to_string();
        let updated = student.clone();
        self.write_all(&students)?;
        Ok(updated)
    }

    pub fn delete(&self, reg_no: &str) -> Result<(), AppError> {
        let mut students = self.all()?;
        let before = students.len();
        students.retain(|s| !s.reg_no.eq_ignore_ascii_case(reg_no));
        if students.len() == before {
            return Err(AppError::NotFound(format!("Student {} not found", reg_no)));
        }
        self.write_all(&students)
    }

    /// Login lookup: name and class compared case-insensitively, the
    /// registration number uppercased, all inputs trimmed.
    pub fn login(
        &self,
        name: &str,
        class_name: &str,
        reg_no: &str,
    ) -> Result<Option<Student>, AppError> {
        let students = self.all()?;
        Ok(students.into_iter().find(|s| {
            s.name.to_lowercase() == name.trim().to_lowercase()
                && s.class_name.to_lowercase() == class_name.trim().to_lowercase()
                && s.reg_no.trim().to_uppercase() == reg_no.trim().to_uppercase()
        }))
    }
}

fn generate_reg_no(students: &[Student]) -> String {
    let year = Utc::now().year();
    loop {
        let n = 1000 + OsRng.next_u32() % 9000;
        let reg_no = format!("EDU-{}-{}", year, n);
        if !students
            .iter()
            .any(|s| s.reg_no.eq_ignore_ascii_case(&reg_no))
        {
            return reg_no;
        }
    }
}
