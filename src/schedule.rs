use std::time::Duration;

/// Handle for cancelling a scheduled action.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerToken(u64);

/// Deferred state changes the engine applies at the start of a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ScheduledAction {
    RespawnAi,
    GrowGrid { threshold: u32 },
    ExpireDoubleScore,
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Entry {
    token: TimerToken,
    due: Duration,
    action: ScheduledAction,
}

/// Game-time timer queue.
///
/// Time is whatever the caller passes in (elapsed game time), which keeps the
/// engine deterministic under a fake clock. Actions due at the same instant
/// fire in scheduling order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Scheduler {
    next_token: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to fire once `due` has been reached.
    pub fn schedule(&mut self, due: Duration, action: ScheduledAction) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Entry { token, due, action });
        token
    }

    /// Cancels a pending action. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.token != token);
        self.entries.len() != before
    }

    /// Removes and returns the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledAction> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.token))
            .map(|(index, _)| index)?;

        Some(self.entries.remove(index).action)
    }

    /// Returns when `token` fires, if it is still pending.
    #[must_use]
    pub fn due_of(&self, token: TimerToken) -> Option<Duration> {
        self.entries
            .iter()
            .find(|entry| entry.token == token)
            .map(|entry| entry.due)
    }

    /// Latest due time among pending actions matching `predicate`.
    #[must_use]
    pub fn latest_due(&self, predicate: impl Fn(&ScheduledAction) -> bool) -> Option<Duration> {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.action))
            .map(|entry| entry.due)
            .max()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
