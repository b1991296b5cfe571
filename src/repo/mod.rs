// src/repo/mod.rs

pub mod accounts;
pub mod active;
pub mod catalog;
pub mod reports;
pub mod roster;

/// Storage keys of the persisted collections.
pub(crate) mod keys {
    pub const STUDENTS: &str = "students";
    pub const SUBJECTS: &str = "subjects";
    pub const EXAMS: &str = "exams";
    pub const REPORTS: &str = "reports";
    pub const ADMINS: &str = "admins";
    pub const CURRENT_STUDENT: &str = "current_student";
    pub const CURRENT_EXAM: &str = "current_exam";
}
