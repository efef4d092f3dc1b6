use crate::timer::{Notifier, PhaseChange};
use tracing::{info, warn};

pub const READY_STATUS: &str = "Ready to focus?";

/// Surfaces phase completions: an in-terminal alert the user has to dismiss,
/// plus an optional desktop notification.
pub struct AppNotifier {
    desktop: bool,
    pending: Option<PhaseChange>,
    latest: Option<PhaseChange>,
}

impl AppNotifier {
    pub fn new(desktop: bool) -> Self {
        Self {
            desktop,
            pending: None,
            latest: None,
        }
    }

    /// One-line status reflecting the last completion since the last reset.
    pub fn status(&self) -> &'static str {
        self.latest.map_or(READY_STATUS, |c| c.headline())
    }

    pub fn reset_status(&mut self) {
        self.latest = None;
    }

    /// The completion waiting to be acknowledged, if any.
    pub fn alert(&self) -> Option<&PhaseChange> {
        self.pending.as_ref()
    }

    pub fn dismiss(&mut self) -> Option<PhaseChange> {
        self.pending.take()
    }

    fn send_desktop_notification(&self, change: &PhaseChange) {
        if let Err(e) = notify_rust::Notification::new()
            .summary("Pomodoro Timer")
            .body(change.message())
            .appname("pomodesk")
            .show()
        {
            warn!("Failed to send notification: {}", e);
        }
    }
}

impl Notifier for AppNotifier {
    fn notify(&mut self, change: &PhaseChange) {
        info!(completed = ?change.completed, next = ?change.next, "{}", change.message());
        if self.desktop {
            self.send_desktop_notification(change);
        }
        self.pending = Some(*change);
        self.latest = Some(*change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodesk_ipc::Phase;

    #[test]
    fn latest_completion_waits_for_dismissal() {
        let mut notifier = AppNotifier::new(false);
        assert!(notifier.alert().is_none());
        assert_eq!(notifier.status(), READY_STATUS);

        let change = PhaseChange {
            completed: Phase::Work,
            next: Phase::ShortBreak,
        };
        notifier.notify(&change);
        assert_eq!(notifier.alert(), Some(&change));
        assert_eq!(notifier.dismiss(), Some(change));
        assert!(notifier.alert().is_none());
        assert_eq!(notifier.status(), "Time for a short break!");

        notifier.reset_status();
        assert_eq!(notifier.status(), READY_STATUS);
    }
}
