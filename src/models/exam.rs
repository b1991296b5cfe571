// src/models/exam.rs

use serde::{Deserialize, Serialize};

/// A single four-option multiple choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// The correct option letter ("A".."D").
    pub correct: String,
}

impl Question {
    /// Returns the option text for a letter, if it names one of the four options.
    pub fn option(&self, letter: &str) -> Option<&str> {
        match letter.trim().to_uppercase().as_str() {
            "A" => Some(self.option_a.as_str()),
            "B" => Some(self.option_b.as_str()),
            "C" => Some(self.option_c.as_str()),
            "D" => Some(self.option_d.as_str()),
            _ => None,
        }
    }
}

/// An authored exam paper for one class and subject.
/// Owned by the authoring screens; the session engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDefinition {
    pub subject: String,
    pub class_name: String,

    /// Exam duration in seconds. Zero means the author never set a timer.
    pub timer: u64,

    pub questions: Vec<Question>,
}
