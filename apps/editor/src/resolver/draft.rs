//! Trailing-edge debounce for draft persistence.
//!
//! Every change event reschedules a single pending write for one quiescence
//! window after the *latest* change; an earlier pending write is cancelled,
//! never queued. The machine is `{Idle, Pending}` with an explicit sequence
//! token: the async driver sleeps out the window and then presents its
//! token, and a token that has been superseded completes nothing. The write
//! payload is captured at completion time, so the final content wins even
//! if the driver task raced a later edit.

use std::time::Duration;

use tokio::time::Instant;

/// Quiescence window between the last change and the cache write.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pending { token: u64, deadline: Instant },
}

#[derive(Debug)]
pub struct DraftDebouncer {
    state: DebounceState,
    next_token: u64,
    window: Duration,
}

impl DraftDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            state: DebounceState::Idle,
            next_token: 0,
            window,
        }
    }

    /// Records a change event, cancelling any pending write and scheduling
    /// a new one. Returns the token the eventual completion must present.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.state = DebounceState::Pending {
            token,
            deadline: now + self.window,
        };
        token
    }

    /// Attempts to complete the pending write for `token`. Succeeds only if
    /// that token is still the current one and its window has elapsed; on
    /// success the machine returns to idle. A superseded or early token is
    /// a no-op.
    pub fn try_complete(&mut self, token: u64, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending {
                token: pending,
                deadline,
            } if pending == token && now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    #[cfg(test)]
    fn is_idle(&self) -> bool {
        self.state == DebounceState::Idle
    }
}

impl Default for DraftDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapid_changes_complete_exactly_once() {
        let mut debouncer = DraftDebouncer::default();
        let start = Instant::now();

        // Ten change events 10ms apart, all inside the 300ms window.
        let tokens: Vec<u64> = (0..10)
            .map(|i| debouncer.schedule(start + Duration::from_millis(i * 10)))
            .collect();

        let after_window = start + Duration::from_millis(500);
        let completed: Vec<u64> = tokens
            .iter()
            .copied()
            .filter(|t| debouncer.try_complete(*t, after_window))
            .collect();

        // Only the final event's token survives.
        assert_eq!(completed, vec![tokens[9]]);
        assert!(debouncer.is_idle());
    }

    #[test]
    fn test_completion_before_deadline_is_refused() {
        let mut debouncer = DraftDebouncer::default();
        let start = Instant::now();
        let token = debouncer.schedule(start);

        assert!(!debouncer.try_complete(token, start + Duration::from_millis(100)));
        assert!(debouncer.try_complete(token, start + Duration::from_millis(300)));
    }

    #[test]
    fn test_new_change_cancels_pending_write() {
        let mut debouncer = DraftDebouncer::default();
        let start = Instant::now();
        let first = debouncer.schedule(start);
        // The second change lands before the first window elapses.
        let second = debouncer.schedule(start + Duration::from_millis(200));

        let late = start + Duration::from_secs(1);
        assert!(!debouncer.try_complete(first, late));
        assert!(debouncer.try_complete(second, late));
    }

    #[test]
    fn test_completed_token_cannot_fire_twice() {
        let mut debouncer = DraftDebouncer::default();
        let start = Instant::now();
        let token = debouncer.schedule(start);
        let late = start + Duration::from_secs(1);

        assert!(debouncer.try_complete(token, late));
        assert!(!debouncer.try_complete(token, late));
    }
}
