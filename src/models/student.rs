// src/models/student.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A roster entry. `reg_no` is the case-insensitive unique key of a student
/// within a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub class_name: String,
    pub reg_no: String,
}

/// DTO for adding a student to the roster, or updating an existing one.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Student name must not be empty."))]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "Class name must not be empty."))]
    pub class_name: String,
}
