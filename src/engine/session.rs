// src/engine/session.rs

use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::AppError;
use crate::models::exam::ExamDefinition;
use crate::models::report::ReportRecord;
use crate::models::student::Student;
use crate::repo::reports::ReportRepository;

use super::grade;

/// Exam duration used when a paper carries no timer. A fallback for badly
/// authored papers, not a business rule.
pub const FALLBACK_TIMER_SECS: u64 = 600;

/// Lifecycle of one exam attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    AlreadyTaken,
    InProgress,
    Submitted,
}

impl SessionStatus {
    /// The transition table. Anything not listed here is refused, which is
    /// what makes `Submitted` and `AlreadyTaken` terminal.
    fn can_become(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Loading, SessionStatus::AlreadyTaken)
                | (SessionStatus::Loading, SessionStatus::InProgress)
                | (SessionStatus::InProgress, SessionStatus::Submitted)
        )
    }
}

/// Result of a submission, frozen once the session reaches `Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub score: u32,
    pub correct_count: usize,
    pub total: usize,
    pub answered_count: usize,

    /// True when the countdown forced the submission.
    pub auto: bool,
}

/// One run of the exam engine for one candidate against one paper.
///
/// Owned exclusively by the caller for the duration of the attempt and
/// discarded afterwards; a second attempt needs a fresh load, which the
/// already-taken gate will refuse.
pub struct ExamSession {
    pub(super) exam: ExamDefinition,
    pub(super) student: Student,
    pub(super) status: SessionStatus,
    pub(super) answers: BTreeMap<usize, String>,
    pub(super) time_remaining: u64,
    pub(super) outcome: Option<SubmitOutcome>,
}

impl ExamSession {
    /// Session Loader: resolves the attempt for the supplied exam and
    /// candidate.
    ///
    /// Fails with `MissingContext` when either input is absent, in which
    /// case no session exists and the caller should return to the relevant
    /// entry screen. When the report collection already holds a record for
    /// this candidate and paper, the session starts, and stays, in
    /// `AlreadyTaken`.
    pub fn load(
        exam: Option<ExamDefinition>,
        student: Option<Student>,
        reports: &ReportRepository,
    ) -> Result<ExamSession, AppError> {
        let exam =
            exam.ok_or_else(|| AppError::MissingContext("no exam selected".to_string()))?;
        let student =
            student.ok_or_else(|| AppError::MissingContext("no candidate logged in".to_string()))?;

        let mut session = ExamSession {
            time_remaining: if exam.timer == 0 {
                FALLBACK_TIMER_SECS
            } else {
                exam.timer
            },
            exam,
            student,
            status: SessionStatus::Loading,
            answers: BTreeMap::new(),
            outcome: None,
        };

        let taken = reports
            .find_by_key(
                &session.student.reg_no,
                &session.exam.subject,
                &session.student.class_name,
            )?
            .is_some();
        if taken {
            tracing::info!(
                "{} has already taken {} ({})",
                session.student.reg_no,
                session.exam.subject,
                session.student.class_name
            );
            session.advance(SessionStatus::AlreadyTaken);
        } else {
            session.advance(SessionStatus::InProgress);
        }

        Ok(session)
    }

    pub(super) fn advance(&mut self, next: SessionStatus) -> bool {
        if self.status.can_become(next) {
            self.status = next;
            true
        } else {
            false
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn exam(&self) -> &ExamDefinition {
        &self.exam
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// The frozen result, present once the session is `Submitted`.
    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Answer Recorder: stores the candidate's pick for a question,
    /// overwriting any earlier pick for the same index.
    ///
    /// Silently ignored outside `InProgress`: selecting an option after
    /// submission has no effect. The letter is taken as-is; whether it names
    /// one of the four options is the presentation layer's concern.
    pub fn record(&mut self, question_index: usize, option_letter: &str) {
        if self.status != SessionStatus::InProgress {
            return;
        }
        self.answers
            .insert(question_index, option_letter.to_string());
    }

    /// Grader and report persister.
    ///
    /// Returns `Ok(None)` when the session is not `InProgress`; this is the
    /// latch that makes a countdown expiry and a manual submit landing in
    /// the same tick window grade at most once. Otherwise grades the answer set,
    /// freezes the result on the session and appends the report record,
    /// where `append_if_absent` is the first-writer-wins backstop.
    pub fn submit(
        &mut self,
        auto: bool,
        reports: &ReportRepository,
    ) -> Result<Option<SubmitOutcome>, AppError> {
        if !self.advance(SessionStatus::Submitted) {
            return Ok(None);
        }

        let summary = grade::grade(&self.answers, &self.exam.questions);
        let outcome = SubmitOutcome {
            score: summary.score,
            correct_count: summary.correct_count,
            total: summary.total,
            answered_count: summary.answered_count,
            auto,
        };
        self.outcome = Some(outcome);

        let created = reports.append_if_absent(ReportRecord {
            name: self.student.name.clone(),
            class_name: self.student.class_name.clone(),
            reg_no: self.student.reg_no.clone(),
            subject: self.exam.subject.clone(),
            score: outcome.score,
            correct_count: outcome.correct_count,
            total: outcome.total,
            answered_count: outcome.answered_count,
            date: Utc::now(),
        })?;

        tracing::info!(
            "{} submitted {}: score {}% ({}/{} correct, auto={}, recorded={})",
            self.student.reg_no,
            self.exam.subject,
            outcome.score,
            outcome.correct_count,
            outcome.total,
            auto,
            created
        );

        Ok(Some(outcome))
    }
}
