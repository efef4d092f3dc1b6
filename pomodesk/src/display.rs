use crate::timer::{DisplaySink, Readout};
use crossterm::{execute, terminal::SetTitle};
use pomodesk_ipc::Phase;
use std::io;
use tracing::debug;

/// Keeps the latest readout for the next frame and mirrors it into the
/// terminal window title.
pub struct TerminalDisplay {
    readout: Readout,
    set_title: bool,
}

impl TerminalDisplay {
    pub fn new(set_title: bool) -> Self {
        Self {
            readout: Readout::new(0, Phase::Work),
            set_title,
        }
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, readout: &Readout) {
        if self.set_title && readout.title() != self.readout.title() {
            if let Err(e) = execute!(io::stdout(), SetTitle(readout.title())) {
                debug!("Failed to set terminal title: {}", e);
            }
        }
        self.readout = *readout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_readout() {
        let mut display = TerminalDisplay::new(false);
        display.render(&Readout::new(299, Phase::ShortBreak));
        assert_eq!(display.readout().clock_face(), "04:59");
        assert_eq!(display.readout().label(), "Break");
    }
}
