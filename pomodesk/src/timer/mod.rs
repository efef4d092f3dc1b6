//! Pomodoro timer core: session policy, countdown state machine and the
//! collaborator seams it drives.

pub mod clock;
pub mod machine;
pub mod policy;
pub mod ports;

pub use clock::{Clock, IntervalClock};
pub use machine::Timer;
pub use ports::{DisplaySink, Notifier, PhaseChange, Readout};
