//! Control socket for pomodeskctl.

pub mod server;

pub use server::{spawn, Request};
