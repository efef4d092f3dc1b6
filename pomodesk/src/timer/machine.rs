//! The countdown state machine.
//!
//! ```text
//! (phase, Stopped) --start--> (phase, Running)
//! (phase, Running) --pause--> (phase, Stopped)
//! (phase, Running) --tick, >1s left--> (phase, Running)
//! (phase, Running) --tick, last second--> (next phase, Stopped)
//! any --reset--> (Work, Stopped)
//! ```
//!
//! Out-of-order commands (start while running, pause or tick while stopped)
//! are silently ignored.

use tracing::debug;

use super::clock::{Clock, TickHandle};
use super::policy::next_phase;
use super::ports::{DisplaySink, Notifier, PhaseChange, Readout};
use crate::settings::Settings;
use pomodesk_ipc::{Phase, TimerState};

pub struct Timer<C, N, D> {
    settings: Settings,
    phase: Phase,
    seconds_remaining: u32,
    completed_work_sessions: u32,
    /// Running iff a tick registration is held.
    tick: Option<TickHandle>,
    clock: C,
    notifier: N,
    display: D,
}

impl<C: Clock, N: Notifier, D: DisplaySink> Timer<C, N, D> {
    pub fn new(settings: Settings, clock: C, notifier: N, display: D) -> Self {
        let mut timer = Self {
            settings,
            phase: Phase::Work,
            seconds_remaining: settings.work_seconds(),
            completed_work_sessions: 0,
            tick: None,
            clock,
            notifier,
            display,
        };
        timer.render();
        timer
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            is_running: self.is_running(),
            completed_work_sessions: self.completed_work_sessions,
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Length of the current phase under the current settings.
    pub fn phase_total_seconds(&self) -> u32 {
        match self.phase {
            Phase::Work => self.settings.work_seconds(),
            Phase::ShortBreak => self.settings.short_break_seconds(),
            Phase::LongBreak => self.settings.long_break_seconds(),
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_total_seconds();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.seconds_remaining as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    #[cfg(test)]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.tick = Some(self.clock.register_tick());
        debug!(phase = ?self.phase, remaining = self.seconds_remaining, "timer started");
    }

    pub fn pause(&mut self) {
        let Some(handle) = self.tick.take() else {
            return;
        };
        self.clock.cancel(handle);
        debug!(phase = ?self.phase, remaining = self.seconds_remaining, "timer paused");
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// One elapsed second.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.complete();
        } else {
            self.render();
        }
    }

    /// Deliver every tick the clock has accumulated. Ticks arriving after a
    /// completion stopped the countdown fall through the `tick` guard.
    pub fn pump_clock(&mut self) {
        for _ in 0..self.clock.due_ticks() {
            self.tick();
        }
    }

    pub fn reset(&mut self) {
        self.pause();
        self.phase = Phase::Work;
        self.seconds_remaining = self.settings.work_seconds();
        debug!(sessions = self.completed_work_sessions, "timer reset");
        self.render();
    }

    /// Use `settings` for phases that begin from now on. The phase in progress
    /// keeps its remaining time.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Apply `settings`, then reset when stopped in a work phase so the new work
    /// length shows immediately. Returns whether the reset happened.
    pub fn apply_settings_and_refresh(&mut self, settings: Settings) -> bool {
        self.apply_settings(settings);
        if !self.is_running() && self.phase == Phase::Work {
            self.reset();
            true
        } else {
            false
        }
    }

    fn complete(&mut self) {
        self.pause();
        let completed = self.phase;
        let (next, duration) = next_phase(completed, self.completed_work_sessions, &self.settings);
        if completed == Phase::Work {
            self.completed_work_sessions = self.completed_work_sessions.saturating_add(1);
        }
        self.phase = next;
        self.seconds_remaining = duration;
        debug!(
            ?completed,
            ?next,
            sessions = self.completed_work_sessions,
            "phase complete"
        );
        self.notifier.notify(&PhaseChange { completed, next });
        self.render();
    }

    fn render(&mut self) {
        self.display
            .render(&Readout::new(self.seconds_remaining, self.phase));
    }
}
