//! One-second tick sources.
//!
//! The timer registers a tick when it starts and cancels it when it stops.
//! The event loop pulls elapsed ticks with [`Clock::due_ticks`] and feeds
//! them to the timer one by one.

use std::time::{Duration, Instant};

/// Identifies one tick registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(u64);

pub trait Clock {
    /// Start delivering ticks at ~1 Hz. Any previous registration is replaced.
    fn register_tick(&mut self) -> TickHandle;

    /// Stop delivering ticks for `handle`. Unknown or stale handles are ignored.
    fn cancel(&mut self, handle: TickHandle);

    /// Whole seconds elapsed for the active registration since the last call.
    fn due_ticks(&mut self) -> u32;
}

struct Registration {
    handle: TickHandle,
    last: Instant,
}

/// Wall-clock tick source backed by [`Instant`].
#[derive(Default)]
pub struct IntervalClock {
    next_id: u64,
    active: Option<Registration>,
}

impl IntervalClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for IntervalClock {
    fn register_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.active = Some(Registration {
            handle,
            last: Instant::now(),
        });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active.as_ref().is_some_and(|r| r.handle == handle) {
            self.active = None;
        }
    }

    fn due_ticks(&mut self) -> u32 {
        let Some(reg) = self.active.as_mut() else {
            return 0;
        };
        let secs = reg.last.elapsed().as_secs();
        // Keep the sub-second remainder for the next poll.
        reg.last += Duration::from_secs(secs);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}

/// Hand-driven clock for tests: ticks are queued explicitly.
#[cfg(test)]
#[derive(Default)]
pub struct ManualClock {
    next_id: u64,
    pub active: Option<TickHandle>,
    pub registrations: u32,
    pub cancellations: u32,
    pub pending: u32,
}

#[cfg(test)]
impl ManualClock {
    /// Queue `n` ticks to be handed out by the next `due_ticks`.
    pub fn advance(&mut self, n: u32) {
        self.pending += n;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn register_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        self.registrations += 1;
        let handle = TickHandle(self.next_id);
        self.active = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active == Some(handle) {
            self.active = None;
            self.cancellations += 1;
        }
    }

    fn due_ticks(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ticks_without_registration() {
        let mut clock = IntervalClock::new();
        assert_eq!(clock.due_ticks(), 0);
    }

    #[test]
    fn fresh_registration_has_nothing_due() {
        let mut clock = IntervalClock::new();
        let handle = clock.register_tick();
        assert_eq!(clock.due_ticks(), 0);
        clock.cancel(handle);
        assert!(clock.active.is_none());
    }

    #[test]
    fn stale_handle_does_not_cancel_new_registration() {
        let mut clock = IntervalClock::new();
        let old = clock.register_tick();
        let new = clock.register_tick();
        assert_ne!(old, new);
        clock.cancel(old);
        assert!(clock.active.is_some());
        clock.cancel(new);
        assert!(clock.active.is_none());
    }
}
