//! Score handoff to the leaderboard and the surrounding shell
//!
//! Each engine owns a `ScoreReporter`. The reporter's latch is the single
//! guarantee that a round produces exactly one leaderboard write and one
//! round-complete notification, however many termination triggers race.

use serde::{Deserialize, Serialize};

use crate::consts::REPORT_RETRIES;
use crate::error::ReportError;
use crate::leaderboard::LeaderboardEntry;

/// Leaderboard level identifier (which mini-game a score belongs to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelId(pub u32);

/// One finished round, as sent to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub name: String,
    pub score: u64,
    pub level: LevelId,
}

/// External score store. Implementations assign the timestamp.
pub trait Leaderboard {
    fn submit_score(&mut self, report: &ScoreReport) -> Result<(), ReportError>;

    /// Highest scores first
    fn top_scores(&self, limit: usize) -> Vec<LeaderboardEntry>;
}

impl<L: Leaderboard + ?Sized> Leaderboard for std::rc::Rc<std::cell::RefCell<L>> {
    fn submit_score(&mut self, report: &ScoreReport) -> Result<(), ReportError> {
        self.borrow_mut().submit_score(report)
    }

    fn top_scores(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.borrow().top_scores(limit)
    }
}

/// Shell callback invoked with the final score
pub type RoundCompleteFn = Box<dyn FnMut(u64)>;

/// One-shot score reporter
pub struct ScoreReporter {
    player_name: String,
    level: LevelId,
    leaderboard: Box<dyn Leaderboard>,
    on_round_complete: Option<RoundCompleteFn>,
    retries: u32,
    reported: bool,
}

impl std::fmt::Debug for ScoreReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreReporter")
            .field("player_name", &self.player_name)
            .field("level", &self.level)
            .field("retries", &self.retries)
            .field("reported", &self.reported)
            .finish()
    }
}

impl ScoreReporter {
    pub fn new(
        player_name: impl Into<String>,
        level: LevelId,
        leaderboard: Box<dyn Leaderboard>,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            level,
            leaderboard,
            on_round_complete: None,
            retries: REPORT_RETRIES,
            reported: false,
        }
    }

    /// Extra immediate attempts after a failed write
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Shell continuation, called once per round with the final score
    pub fn on_round_complete(mut self, callback: impl FnMut(u64) + 'static) -> Self {
        self.on_round_complete = Some(Box::new(callback));
        self
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn has_reported(&self) -> bool {
        self.reported
    }

    /// Report a final score. Returns false if this round already reported.
    ///
    /// Write failures are logged and dropped; the round completes either way.
    pub fn report(&mut self, score: u64) -> bool {
        if self.reported {
            log::debug!("Score already reported this round, ignoring {}", score);
            return false;
        }
        self.reported = true;

        if self.player_name.trim().is_empty() {
            log::warn!("No player name, score {} not submitted", score);
        } else {
            let report = ScoreReport {
                name: self.player_name.clone(),
                score,
                level: self.level,
            };
            self.submit_with_retry(&report);
        }

        if let Some(callback) = self.on_round_complete.as_mut() {
            callback(score);
        }
        true
    }

    /// Allow the next round to report
    pub fn rearm(&mut self) {
        self.reported = false;
    }

    /// Read access for the shell's leaderboard screen
    pub fn top_scores(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.leaderboard.top_scores(limit)
    }

    fn submit_with_retry(&mut self, report: &ScoreReport) {
        for attempt in 0..=self.retries {
            match self.leaderboard.submit_score(report) {
                Ok(()) => {
                    log::info!(
                        "Score submitted: {} scored {} on level {}",
                        report.name,
                        report.score,
                        report.level.0
                    );
                    return;
                }
                Err(e) if attempt < self.retries => {
                    log::warn!("Score submit failed (attempt {}): {}", attempt + 1, e);
                }
                Err(e) => {
                    log::error!("Error saving score: {}", e);
                }
            }
        }
    }
}
