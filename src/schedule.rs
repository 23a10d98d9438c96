//! Fixed-interval timers
//!
//! Each engine owns one `Scheduler`. The host only supplies elapsed wall-clock
//! time; the scheduler decides which timers are due and in what order.
//!
//! Every fire is stamped with the epoch it was produced under. Cancelling all
//! timers bumps the epoch, so fires collected before a round ended are
//! recognisably stale when the engine gets to them.

use std::fmt::Debug;

/// Most fires one timer may produce in a single `advance`. A longer stall
/// skips the missed periods and keeps the timer's phase.
pub const MAX_CATCH_UP: u32 = 16;

/// A timer that came due during `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub kind: K,
    pub epoch: u64,
}

#[derive(Debug, Clone)]
struct Timer<K> {
    kind: K,
    period_ms: f64,
    due_ms: f64,
}

/// Virtual clock plus a set of repeating timers
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    now_ms: f64,
    epoch: u64,
    timers: Vec<Timer<K>>,
}

impl<K: Copy + PartialEq + Debug> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq + Debug> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            epoch: 0,
            timers: Vec::new(),
        }
    }

    /// Milliseconds of virtual time since creation
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Schedule `kind` to fire every `period_ms`, first one period from now.
    /// Re-registering a kind replaces its previous timer.
    pub fn every(&mut self, kind: K, period_ms: f64) {
        self.cancel(kind);
        let period_ms = period_ms.max(1.0);
        self.timers.push(Timer {
            kind,
            period_ms,
            due_ms: self.now_ms + period_ms,
        });
    }

    /// Cancel one timer; returns whether it was scheduled
    pub fn cancel(&mut self, kind: K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        self.timers.len() != before
    }

    /// Cancel every timer and invalidate fires already handed out
    pub fn cancel_all(&mut self) {
        if !self.timers.is_empty() {
            log::debug!("Cancelling {} timers (epoch {})", self.timers.len(), self.epoch);
        }
        self.timers.clear();
        self.epoch += 1;
    }

    pub fn is_scheduled(&self, kind: K) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Number of live timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Whether a fire still belongs to the live set of timers
    pub fn is_current(&self, fired: &Fired<K>) -> bool {
        fired.epoch == self.epoch
    }

    /// Advance the clock and collect the fires that came due, oldest first.
    /// Timers due at the same instant fire in registration order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Fired<K>> {
        self.now_ms += dt_ms.max(0.0);
        let now_ms = self.now_ms;

        let mut due: Vec<(f64, usize, K)> = Vec::new();
        for (order, timer) in self.timers.iter_mut().enumerate() {
            let mut fires = 0;
            while timer.due_ms <= now_ms && fires < MAX_CATCH_UP {
                due.push((timer.due_ms, order, timer.kind));
                timer.due_ms += timer.period_ms;
                fires += 1;
            }
            if timer.due_ms <= now_ms {
                let missed = ((now_ms - timer.due_ms) / timer.period_ms).floor() + 1.0;
                timer.due_ms += missed * timer.period_ms;
                log::warn!("{:?} timer skipped {} missed periods", timer.kind, missed);
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let epoch = self.epoch;
        due.into_iter()
            .map(|(_, _, kind)| Fired { kind, epoch })
            .collect()
    }
}
