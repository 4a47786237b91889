//! Single-timer debounce bookkeeping.
//!
//! The scheduler is pure state: it tracks one deadline and whether the one
//! timer task for the store is alive. The store drives the actual sleeping.
//! A debounced edit either starts that timer or moves its deadline; it never
//! starts a second one.

use std::time::Duration;

use tokio::time::Instant;

/// Result of scheduling a debounced dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    /// No timer is alive; the caller must start one that wakes at `deadline`.
    Start(Instant),
    /// The live timer picks up the new deadline when it next wakes.
    Rearmed,
}

/// What the timer should do after waking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPoll {
    /// Deadline reached: dispatch now. The timer is retired.
    Fire,
    /// Deadline was moved: sleep until this instant.
    Wait(Instant),
    /// Nothing pending (cancelled or shut down). The timer is retired.
    Idle,
}

/// Debounce state for one store.
#[derive(Debug)]
pub struct DebounceScheduler {
    window: Duration,
    deadline: Option<Instant>,
    timer_alive: bool,
}

impl DebounceScheduler {
    /// Create a scheduler with the given window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            timer_alive: false,
        }
    }

    /// The configured window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a debounced dispatch is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arm (or re-arm) the timer for a debounced edit made at `now`.
    pub fn schedule(&mut self, now: Instant) -> Arm {
        let deadline = now + self.window;
        self.deadline = Some(deadline);
        if self.timer_alive {
            Arm::Rearmed
        } else {
            self.timer_alive = true;
            Arm::Start(deadline)
        }
    }

    /// Drop the pending dispatch. Returns `true` if one was armed.
    ///
    /// A live timer stays alive and retires itself on its next wake.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Called by the timer each time it wakes.
    pub fn poll(&mut self, now: Instant) -> TimerPoll {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.timer_alive = false;
                TimerPoll::Fire
            }
            Some(deadline) => TimerPoll::Wait(deadline),
            None => {
                self.timer_alive = false;
                TimerPoll::Idle
            }
        }
    }
}
