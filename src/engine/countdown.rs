// src/engine/countdown.rs

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::error::AppError;
use crate::repo::reports::ReportRepository;

use super::session::{ExamSession, SessionStatus, SubmitOutcome};

/// What a single one-second tick did to the session.
#[derive(Debug, Clone, Copy)]
pub enum TickOutcome {
    /// Still in progress; the remaining time after the tick.
    Running(u64),
    /// The clock reached zero on this tick and the session auto-submitted.
    Expired(SubmitOutcome),
    /// The session had already left `InProgress`; nothing was done.
    Stopped,
}

impl ExamSession {
    /// Advances the countdown by one second.
    ///
    /// Only `InProgress` sessions tick. Once any submission path has begun
    /// the clock is dead and further ticks are `Stopped` no-ops, so the
    /// expiry submit fires exactly once and cannot double up with a manual
    /// submit scheduled in the same tick window.
    pub fn tick(&mut self, reports: &ReportRepository) -> Result<TickOutcome, AppError> {
        if self.status != SessionStatus::InProgress {
            return Ok(TickOutcome::Stopped);
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return Ok(TickOutcome::Running(self.time_remaining));
        }

        match self.submit(true, reports)? {
            Some(outcome) => Ok(TickOutcome::Expired(outcome)),
            None => Ok(TickOutcome::Stopped),
        }
    }
}

/// Drives `tick` once a second until the session leaves `InProgress`.
///
/// Returns the auto-submit outcome when the clock ran out, or `None` when
/// something else ended the session first (a manual submit on another branch
/// of the caller's select loop).
pub async fn run(
    session: &mut ExamSession,
    reports: &ReportRepository,
) -> Result<Option<SubmitOutcome>, AppError> {
    let mut interval = time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick of a tokio interval completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        match session.tick(reports)? {
            TickOutcome::Running(_) => continue,
            TickOutcome::Expired(outcome) => return Ok(Some(outcome)),
            TickOutcome::Stopped => return Ok(None),
        }
    }
}

/// Formats remaining seconds the way the exam header shows them, `h:mm:ss`
/// with the hours omitted while zero.
pub fn format_clock(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
