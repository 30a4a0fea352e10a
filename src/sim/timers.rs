//! Cancelable one-shot timers driven by the frame clock
//!
//! Timers fire at the start of a tick once `now >= due_ms`. At most one timer
//! of each kind is pending: scheduling a kind that is already pending replaces
//! it. Starting a run cancels everything so nothing from the previous run can
//! land in the new one.

/// Handle returned by [`Timers::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Player lands and may jump again
    JumpReset,
    /// Countdown shows the next number (or starts play after the last)
    CountdownStep,
}

/// A pending timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub token: TimerToken,
    pub kind: TimerKind,
    pub due_ms: f64,
}

/// Pending timer table
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Timer>,
    next_token: u64,
}

impl Timers {
    /// Schedule `kind` at `due_ms`, cancelling a pending timer of the same kind
    pub fn schedule(&mut self, kind: TimerKind, due_ms: f64) -> TimerToken {
        if self.cancel_kind(kind) {
            log::debug!("Replaced pending {:?} timer", kind);
        }
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push(Timer {
            token,
            kind,
            due_ms,
        });
        token
    }

    fn cancel_kind(&mut self, kind: TimerKind) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.kind != kind);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn due_at(&self, kind: TimerKind) -> Option<f64> {
        self.pending.iter().find(|t| t.kind == kind).map(|t| t.due_ms)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Timer> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_due_time_not_before() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::JumpReset, 600.0);
        assert!(timers.pop_due(599.9).is_none());
        let fired = timers.pop_due(600.0).unwrap();
        assert_eq!(fired.kind, TimerKind::JumpReset);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_same_kind_replaces() {
        let mut timers = Timers::default();
        let first = timers.schedule(TimerKind::JumpReset, 600.0);
        let second = timers.schedule(TimerKind::JumpReset, 900.0);
        assert_ne!(first, second);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.due_at(TimerKind::JumpReset), Some(900.0));
        assert!(timers.pop_due(800.0).is_none());
        assert_eq!(timers.pop_due(900.0).unwrap().token, second);
    }

    #[test]
    fn test_pop_due_in_due_order() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::CountdownStep, 1000.0);
        timers.schedule(TimerKind::JumpReset, 500.0);
        assert_eq!(timers.pop_due(2000.0).unwrap().kind, TimerKind::JumpReset);
        assert_eq!(timers.pop_due(2000.0).unwrap().kind, TimerKind::CountdownStep);
        assert!(timers.pop_due(2000.0).is_none());
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::default();
        timers.schedule(TimerKind::CountdownStep, 1000.0);
        timers.schedule(TimerKind::JumpReset, 500.0);
        timers.cancel_all();
        assert!(timers.is_empty());
        assert!(!timers.is_pending(TimerKind::CountdownStep));
        assert!(timers.pop_due(f64::MAX).is_none());
    }
}
