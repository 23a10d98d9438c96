//! In-memory leaderboard
//!
//! Stands in for the hosted score store: keeps every submitted score sorted
//! descending, stamps entries on write, and pushes the top-N to subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::report::{Leaderboard, LevelId, ScoreReport};

/// Default number of entries a leaderboard screen shows
pub const DEFAULT_TOP_N: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub level: LevelId,
    /// Unix timestamp (ms) assigned when the score was stored
    pub timestamp: f64,
}

struct Subscriber {
    limit: usize,
    tx: Sender<Vec<LeaderboardEntry>>,
}

/// Leaderboard kept in process memory
#[derive(Default)]
pub struct LocalLeaderboard {
    entries: Vec<LeaderboardEntry>,
    subscribers: Vec<Subscriber>,
    offline: bool,
}

impl std::fmt::Debug for LocalLeaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLeaderboard")
            .field("entries", &self.entries.len())
            .field("subscribers", &self.subscribers.len())
            .field("offline", &self.offline)
            .finish()
    }
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Simulate a backend outage: writes fail until switched back on
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Live view of the top `limit` scores.
    ///
    /// The current standings are sent immediately, then again after every
    /// successful write. Dropping the receiver ends the subscription.
    pub fn subscribe_top_scores(&mut self, limit: usize) -> Receiver<Vec<LeaderboardEntry>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.top(limit));
        self.subscribers.push(Subscriber { limit, tx });
        rx
    }

    fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.entries.iter().take(limit).cloned().collect()
    }

    fn insert(&mut self, entry: LeaderboardEntry) -> usize {
        // Ties keep submission order
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        pos + 1
    }

    fn notify(&mut self) {
        let entries = &self.entries;
        self.subscribers.retain(|sub| {
            let top: Vec<LeaderboardEntry> = entries.iter().take(sub.limit).cloned().collect();
            sub.tx.send(top).is_ok()
        });
    }
}

impl Leaderboard for LocalLeaderboard {
    fn submit_score(&mut self, report: &ScoreReport) -> Result<(), ReportError> {
        if self.offline {
            return Err(ReportError::Unavailable("leaderboard offline".into()));
        }
        if report.name.trim().is_empty() {
            return Err(ReportError::Rejected("empty player name".into()));
        }

        let rank = self.insert(LeaderboardEntry {
            name: report.name.clone(),
            score: report.score,
            level: report.level,
            timestamp: now_ms(),
        });
        log::debug!("{} placed #{} with {}", report.name, rank, report.score);

        self.notify();
        Ok(())
    }

    fn top_scores(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.top(limit)
    }
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
