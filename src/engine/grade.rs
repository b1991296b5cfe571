// src/engine/grade.rs

use std::collections::BTreeMap;

use crate::models::exam::Question;

/// Totals computed when an attempt is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeSummary {
    pub score: u32,
    pub correct_count: usize,
    pub total: usize,
    pub answered_count: usize,
}

/// Grades a sparse answer set against the paper's questions.
///
/// Answers and correct options are compared trimmed and uppercased, so
/// `" b "` matches `"B"`. Unanswered indices never match. A paper with no
/// questions grades to a score of zero rather than dividing by it.
pub fn grade(answers: &BTreeMap<usize, String>, questions: &[Question]) -> GradeSummary {
    let total = questions.len();
    let answered_count = answers.len();

    let correct_count = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| {
            answers
                .get(i)
                .is_some_and(|a| a.trim().to_uppercase() == q.correct.trim().to_uppercase())
        })
        .count();

    let score = if total == 0 {
        0
    } else {
        (correct_count as f64 / total as f64 * 100.0).round() as u32
    };

    GradeSummary {
        score,
        correct_count,
        total,
        answered_count,
    }
}
