// src/engine/mod.rs

pub mod countdown;
pub mod grade;
pub mod session;

pub use countdown::TickOutcome;
pub use grade::GradeSummary;
pub use session::{ExamSession, SessionStatus, SubmitOutcome};
