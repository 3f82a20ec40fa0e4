//! The sliding call window
//!
//! [`CallWindow`] is the single piece of mutable state behind a
//! [`RateLimiter`](super::RateLimiter): an ordered sequence of call
//! timestamps, pruned against a trailing window on every observation.
//! All methods take an explicit `now` so the admission logic can be
//! tested deterministically.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime};

/// Sliding window of recorded call timestamps plus in-flight reservations.
///
/// A slot is consumed either by a retained timestamp (a recorded call that
/// has not yet aged out) or by a pending reservation (a caller that has been
/// admitted but has not yet recorded its call). Admission is granted only
/// while `retained + pending` stays below the ceiling, so concurrent callers
/// cannot over-admit between their admit and record steps.
#[derive(Debug)]
pub(crate) struct CallWindow {
    calls: VecDeque<SystemTime>,
    pending: usize,
    window: Duration,
    ceiling: usize,
}

impl CallWindow {
    pub(crate) fn new(window: Duration, ceiling: usize) -> Self {
        CallWindow {
            calls: VecDeque::new(),
            pending: 0,
            window,
            ceiling,
        }
    }

    /// Drop every timestamp that has aged out of the trailing window.
    ///
    /// A timestamp `t` is stale once `t + window <= now`.
    fn prune(&mut self, now: SystemTime) {
        while self
            .calls
            .front()
            .is_some_and(|&t| t + self.window <= now)
        {
            self.calls.pop_front();
        }
    }

    /// Try to admit one more call.
    ///
    /// Returns `None` when a slot was reserved, or `Some(wait)` with the
    /// time until the oldest retained timestamp ages out. When every slot
    /// is held by a reservation (nothing retained to age out), the wait is
    /// zero and the caller is expected to back off briefly and re-check.
    pub(crate) fn admit(&mut self, now: SystemTime) -> Option<Duration> {
        self.prune(now);
        if self.calls.len() + self.pending < self.ceiling {
            self.pending += 1;
            return None;
        }
        let wait = self.calls.front().map_or(Duration::ZERO, |&oldest| {
            (oldest + self.window)
                .duration_since(now)
                .unwrap_or(Duration::ZERO)
        });
        Some(wait)
    }

    /// Append a call timestamp, releasing one pending reservation if any.
    pub(crate) fn record(&mut self, now: SystemTime) {
        self.prune(now);
        self.pending = self.pending.saturating_sub(1);
        self.calls.push_back(now);
    }

    /// Free slots right now, counting retained timestamps only.
    pub(crate) fn remaining(&mut self, now: SystemTime) -> usize {
        self.prune(now);
        self.ceiling.saturating_sub(self.calls.len())
    }

    /// Merge previously persisted timestamps into the window.
    ///
    /// Stale entries are discarded; the rest are interleaved with whatever
    /// the window already holds, keeping the sequence ascending. Returns
    /// the number of entries actually merged.
    pub(crate) fn merge(
        &mut self,
        timestamps: impl IntoIterator<Item = SystemTime>,
        now: SystemTime,
    ) -> usize {
        self.prune(now);
        let before = self.calls.len();
        for t in timestamps {
            if t + self.window > now && t <= now {
                self.calls.push_back(t);
            }
        }
        let merged = self.calls.len() - before;
        if merged > 0 {
            self.calls.make_contiguous().sort();
        }
        merged
    }

    /// Prune, then copy out the retained timestamps for persistence.
    pub(crate) fn snapshot(&mut self, now: SystemTime) -> Vec<SystemTime> {
        self.prune(now);
        self.calls.iter().copied().collect()
    }
}
