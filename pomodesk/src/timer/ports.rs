//! Outbound collaborators of the timer.
//!
//! ```text
//!   Timer ──▶ Notifier     (once per completed phase)
//!         └─▶ DisplaySink  (after every change of remaining time or phase)
//! ```

use pomodesk_ipc::Phase;

/// Emitted when a countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub completed: Phase,
    pub next: Phase,
}

impl PhaseChange {
    /// Status line shown once the new phase is loaded.
    pub fn headline(&self) -> &'static str {
        match self.next {
            Phase::ShortBreak => "Time for a short break!",
            Phase::LongBreak => "Time for a long break!",
            Phase::Work => "Back to work!",
        }
    }

    /// Longer alert text.
    pub fn message(&self) -> &'static str {
        match self.next {
            Phase::ShortBreak => "Work session complete! Take a short break.",
            Phase::LongBreak => "Great job! Take a long break.",
            Phase::Work => "Break over! Ready to focus?",
        }
    }
}

/// Remaining time split for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readout {
    pub minutes: u32,
    pub seconds: u32,
    pub phase: Phase,
}

impl Readout {
    pub fn new(seconds_remaining: u32, phase: Phase) -> Self {
        Self {
            minutes: seconds_remaining / 60,
            seconds: seconds_remaining % 60,
            phase,
        }
    }

    /// `MM:SS`, both parts zero-padded to at least two digits.
    pub fn clock_face(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }

    pub fn label(&self) -> &'static str {
        self.phase.label()
    }

    /// `MM:SS - Focus` as used for the window title.
    pub fn title(&self) -> String {
        format!("{} - {}", self.clock_face(), self.label())
    }
}

pub trait Notifier {
    fn notify(&mut self, change: &PhaseChange);
}

pub trait DisplaySink {
    fn render(&mut self, readout: &Readout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_pads_both_fields() {
        let readout = Readout::new(65, Phase::Work);
        assert_eq!(readout.clock_face(), "01:05");
        assert_eq!(readout.title(), "01:05 - Focus");
        assert_eq!(Readout::new(1500, Phase::ShortBreak).title(), "25:00 - Break");
    }

    #[test]
    fn long_work_phases_keep_all_minute_digits() {
        assert_eq!(Readout::new(120 * 60, Phase::Work).clock_face(), "120:00");
    }

    #[test]
    fn messages_follow_the_next_phase() {
        let change = PhaseChange {
            completed: Phase::Work,
            next: Phase::LongBreak,
        };
        assert_eq!(change.headline(), "Time for a long break!");
        assert_eq!(change.message(), "Great job! Take a long break.");
    }
}
