//! Debounced, single-flight check scheduling.
//!
//! The scheduler never sleeps itself. [`Scheduler::on_edit`] hands the host
//! a [`TimerRequest`]; the host sleeps for the requested delay and reports
//! back with [`Scheduler::on_timer_fired`]. Every edit issues a fresh
//! token, so only the timer of the last edit in a burst is honoured.

use std::time::Duration;

use tracing::debug;

use crate::SessionError;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Debouncing,
    Checking,
}

impl SchedulerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Debouncing => "debouncing",
            Self::Checking => "checking",
        }
    }
}

/// Identifies one debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Asks the host to call back after `delay` with `token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay: Duration,
}

/// What a fired timer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDecision {
    /// A later edit superseded this timer.
    Stale,
    /// A check is running; the timer is re-requested when it finishes.
    Deferred,
    /// A check is due, subject to the content-change guard.
    Due,
}

/// Trailing-edge debounce plus single-flight guard.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    auto_check: bool,
    delay: Duration,
    next_token: u64,
    pending: Option<TimerToken>,
    fired_while_checking: bool,
}

impl Scheduler {
    pub fn new(auto_check: bool, delay: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            auto_check,
            delay,
            next_token: 0,
            pending: None,
            fired_while_checking: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_checking(&self) -> bool {
        self.state == SchedulerState::Checking
    }

    pub fn auto_check(&self) -> bool {
        self.auto_check
    }

    pub fn set_auto_check(&mut self, enabled: bool) {
        self.auto_check = enabled;
        if !enabled {
            self.pending = None;
            self.fired_while_checking = false;
            if self.state == SchedulerState::Debouncing {
                self.state = SchedulerState::Idle;
            }
        }
    }

    /// Records an edit and (re)starts the debounce timer.
    ///
    /// Returns `None` when automatic checking is off.
    pub fn on_edit(&mut self) -> Option<TimerRequest> {
        if !self.auto_check {
            return None;
        }

        let request = self.arm();
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Debouncing;
        }
        debug!(
            "Debounce timer {} armed ({})",
            request.token.value(),
            self.state.as_str()
        );
        Some(request)
    }

    /// Handles a fired timer.
    pub fn on_timer_fired(&mut self, token: TimerToken) -> TimerDecision {
        if self.pending != Some(token) {
            debug!("Ignoring stale timer {}", token.value());
            return TimerDecision::Stale;
        }

        self.pending = None;

        if self.state == SchedulerState::Checking {
            debug!("Timer {} fired during a check; deferring", token.value());
            self.fired_while_checking = true;
            return TimerDecision::Deferred;
        }

        TimerDecision::Due
    }

    /// Enters `Checking`, cancelling any pending timer.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_checking() {
            return Err(SessionError::AlreadyInProgress);
        }
        self.pending = None;
        self.state = SchedulerState::Checking;
        Ok(())
    }

    /// Leaves `Checking`.
    ///
    /// Returns a timer request when a timer fired while the check ran.
    pub fn finish(&mut self) -> Option<TimerRequest> {
        self.state = SchedulerState::Idle;

        if std::mem::take(&mut self.fired_while_checking) && self.auto_check {
            let request = self.arm();
            self.state = SchedulerState::Debouncing;
            return Some(request);
        }

        if self.pending.is_some() {
            self.state = SchedulerState::Debouncing;
        }
        None
    }

    /// Returns to rest without checking (no change, cache hit, empty text).
    pub fn settle(&mut self) {
        if self.is_checking() {
            return;
        }
        self.state = if self.pending.is_some() {
            SchedulerState::Debouncing
        } else {
            SchedulerState::Idle
        };
    }

    /// Drops all timers and returns to `Idle`.
    pub fn reset(&mut self) {
        self.pending = None;
        self.fired_while_checking = false;
        self.state = SchedulerState::Idle;
    }

    fn arm(&mut self) -> TimerRequest {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending = Some(token);
        TimerRequest {
            token,
            delay: self.delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scheduler() -> Scheduler {
        Scheduler::new(true, Duration::from_millis(2000))
    }

    #[test]
    fn test_edit_arms_timer() {
        let mut s = scheduler();
        let request = s.on_edit().unwrap();
        assert_eq!(request.delay, Duration::from_millis(2000));
        assert_eq!(s.state(), SchedulerState::Debouncing);
    }

    #[test]
    fn test_auto_check_disabled() {
        let mut s = Scheduler::new(false, Duration::from_millis(10));
        assert!(s.on_edit().is_none());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_burst_coalesces_to_last_timer() {
        let mut s = scheduler();
        let tokens: Vec<_> = (0..5).map(|_| s.on_edit().unwrap().token).collect();

        let due = tokens
            .iter()
            .filter(|&&t| s.on_timer_fired(t) == TimerDecision::Due)
            .count();

        assert_eq!(due, 1);
    }

    #[test]
    fn test_timer_fires_once() {
        let mut s = scheduler();
        let token = s.on_edit().unwrap().token;
        assert_eq!(s.on_timer_fired(token), TimerDecision::Due);
        assert_eq!(s.on_timer_fired(token), TimerDecision::Stale);
    }

    #[test]
    fn test_single_flight() {
        let mut s = scheduler();
        s.start().unwrap();
        assert!(matches!(s.start(), Err(SessionError::AlreadyInProgress)));
        assert!(s.finish().is_none());
        assert_eq!(s.state(), SchedulerState::Idle);
        assert!(s.start().is_ok());
    }

    #[test]
    fn test_start_cancels_pending_timer() {
        let mut s = scheduler();
        let token = s.on_edit().unwrap().token;
        s.start().unwrap();
        assert_eq!(s.on_timer_fired(token), TimerDecision::Stale);
    }

    #[test]
    fn test_edit_during_check_keeps_checking() {
        let mut s = scheduler();
        s.start().unwrap();
        s.on_edit().unwrap();
        assert_eq!(s.state(), SchedulerState::Checking);

        assert!(s.finish().is_none());
        assert_eq!(s.state(), SchedulerState::Debouncing);
    }

    #[test]
    fn test_timer_during_check_is_rearmed() {
        let mut s = scheduler();
        s.start().unwrap();
        let token = s.on_edit().unwrap().token;

        assert_eq!(s.on_timer_fired(token), TimerDecision::Deferred);

        let rearmed = s.finish().unwrap();
        assert_ne!(rearmed.token, token);
        assert_eq!(s.state(), SchedulerState::Debouncing);
        assert_eq!(s.on_timer_fired(rearmed.token), TimerDecision::Due);
    }

    #[test]
    fn test_settle() {
        let mut s = scheduler();
        let token = s.on_edit().unwrap().token;
        s.on_timer_fired(token);
        s.settle();
        assert_eq!(s.state(), SchedulerState::Idle);

        s.on_edit();
        s.settle();
        assert_eq!(s.state(), SchedulerState::Debouncing);
    }

    #[test]
    fn test_reset() {
        let mut s = scheduler();
        let token = s.on_edit().unwrap().token;
        s.reset();
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.on_timer_fired(token), TimerDecision::Stale);
    }

    #[test]
    fn test_disabling_auto_check_drops_timer() {
        let mut s = scheduler();
        let token = s.on_edit().unwrap().token;
        s.set_auto_check(false);
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.on_timer_fired(token), TimerDecision::Stale);
    }
}
