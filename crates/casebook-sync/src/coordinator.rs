//! Generation-gated read coordination.
//!
//! Every list read gets a fresh [`Generation`] and its own cancellation
//! handle. Starting a read cancels the previous one, and a finished read is
//! applied only if nothing was dispatched after it. The coordinator holds no
//! state about the list itself; the store asks it for a [`Verdict`] and acts
//! on that.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Monotonic dispatch counter owned by one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// The abort switch for one in-flight read.
///
/// Cancelling consumes the handle, so a handle fires at most once.
#[derive(Debug)]
pub struct CancellationHandle {
    token: CancellationToken,
    generation: Generation,
}

impl CancellationHandle {
    /// Generation of the read this handle controls.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Signal the transport to abort.
    pub fn cancel(self) {
        trace!(generation = %self.generation, "cancelling read");
        self.token.cancel();
    }
}

/// What a dispatched read carries back to the coordinator.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Generation captured at dispatch.
    pub generation: Generation,
    /// Abort signal passed to the transport.
    pub signal: CancellationToken,
}

/// Decision for a finished read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Current generation: apply the result.
    Apply,
    /// A newer read was dispatched: drop silently.
    Stale,
    /// The read was aborted: drop silently, whatever it resolved to.
    Cancelled,
}

/// Issues generations and owns the single live cancellation handle.
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    generation: Generation,
    in_flight: Option<CancellationHandle>,
}

impl FetchCoordinator {
    /// Create a coordinator at generation zero with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a read: bump the generation, cancel the previous read if it is
    /// still unresolved, and hand out a ticket for the new one.
    pub fn begin(&mut self) -> Ticket {
        let generation = self.generation.next();
        self.generation = generation;

        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        self.in_flight = Some(CancellationHandle {
            token: token.clone(),
            generation,
        });

        Ticket {
            generation,
            signal: token,
        }
    }

    /// The most recently issued generation.
    #[must_use]
    pub fn current(&self) -> Generation {
        self.generation
    }

    /// Whether a read is dispatched and unresolved.
    #[must_use]
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Decide what to do with a finished read.
    ///
    /// `cancelled` is whether the transport resolved with the cancellation
    /// kind. A read whose signal fired is treated as cancelled even if the
    /// transport resolved normally.
    pub fn settle(&mut self, ticket: &Ticket, cancelled: bool) -> Verdict {
        let is_current = ticket.generation == self.generation;
        if is_current {
            self.in_flight = None;
        }

        if cancelled || ticket.signal.is_cancelled() {
            Verdict::Cancelled
        } else if is_current {
            Verdict::Apply
        } else {
            Verdict::Stale
        }
    }

    /// Cancel whatever is in flight. Returns `true` if a handle was invoked.
    pub fn abort(&mut self) -> bool {
        match self.in_flight.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_strictly_increase() {
        let mut coordinator = FetchCoordinator::new();
        let first = coordinator.begin();
        let second = coordinator.begin();
        let third = coordinator.begin();

        assert!(first.generation < second.generation);
        assert!(second.generation < third.generation);
        assert_eq!(coordinator.current(), third.generation);
    }

    #[test]
    fn test_begin_cancels_previous() {
        let mut coordinator = FetchCoordinator::new();
        let first = coordinator.begin();
        assert!(!first.signal.is_cancelled());

        let second = coordinator.begin();
        assert!(first.signal.is_cancelled());
        assert!(!second.signal.is_cancelled());
    }

    #[test]
    fn test_settle_current_applies() {
        let mut coordinator = FetchCoordinator::new();
        let ticket = coordinator.begin();
        assert_eq!(coordinator.settle(&ticket, false), Verdict::Apply);
        assert!(!coordinator.has_in_flight());
    }

    #[test]
    fn test_settle_superseded() {
        let mut coordinator = FetchCoordinator::new();
        let old = coordinator.begin();
        let new = coordinator.begin();

        // The old read was cancelled by `begin`, so it never counts as stale-but-live.
        assert_eq!(coordinator.settle(&old, false), Verdict::Cancelled);
        assert!(coordinator.has_in_flight());
        assert_eq!(coordinator.settle(&new, false), Verdict::Apply);
    }

    #[test]
    fn test_settle_stale_without_signal() {
        let mut coordinator = FetchCoordinator::new();
        let old = coordinator.begin();
        let _new = coordinator.begin();
        let detached = Ticket {
            generation: old.generation,
            signal: CancellationToken::new(),
        };
        assert_eq!(coordinator.settle(&detached, false), Verdict::Stale);
    }

    #[test]
    fn test_cancellation_kind_never_applies() {
        let mut coordinator = FetchCoordinator::new();
        let ticket = coordinator.begin();
        assert_eq!(coordinator.settle(&ticket, true), Verdict::Cancelled);
    }

    #[test]
    fn test_abort_fires_once() {
        let mut coordinator = FetchCoordinator::new();
        let ticket = coordinator.begin();
        assert!(coordinator.abort());
        assert!(ticket.signal.is_cancelled());
        assert!(!coordinator.abort());
    }
}
