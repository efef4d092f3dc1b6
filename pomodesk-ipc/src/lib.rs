//! Inter-process communication between pomodesk and pomodeskctl
//!
//! We use Unix domain sockets for local IPC - they're fast, secure,
//! and perfect for this use case. One JSON line goes each way per connection.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

/// Commands that pomodeskctl can send to pomodesk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Status,
    AddTask { text: String },
    ListTasks,
    ToggleTask { id: i64 },
    DeleteTask { id: i64 },
    ToggleSound,
    SetSound { kind: String },
    SetVolume { volume: f32 },
}

/// Responses from pomodesk back to pomodeskctl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Ok,
    Status(TimerState),
    Tasks(Vec<TaskEntry>),
    Sound(SoundStatus),
    Error(String),
}

/// A named countdown interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Short label used in the clock readout and window title.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus",
            Phase::ShortBreak | Phase::LongBreak => "Break",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }
}

/// Snapshot of the timer core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub is_running: bool,
    pub completed_work_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundStatus {
    pub kind: String,
    pub volume: f32,
    pub playing: bool,
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection refused - is pomodesk running?")]
    ConnectionRefused,
}

pub const SOCKET_PATH: &str = "/tmp/pomodesk.sock";

/// Send one command to a running pomodesk and wait for its reply.
pub async fn send_command(cmd: &Command) -> Result<Response, IpcError> {
    send_command_to(SOCKET_PATH, cmd).await
}

pub async fn send_command_to(path: &str, cmd: &Command) -> Result<Response, IpcError> {
    let stream = UnixStream::connect(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound => {
            IpcError::ConnectionRefused
        }
        _ => IpcError::Io(e),
    })?;
    let (reader, mut writer) = stream.into_split();

    let mut msg = serde_json::to_vec(cmd)?;
    msg.push(b'\n');
    writer.write_all(&msg).await?;
    writer.flush().await?;

    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line).await?;
    Ok(serde_json::from_str(&line)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_externally_tagged_json() {
        let json = serde_json::to_string(&Command::AddTask {
            text: "write report".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"AddTask":{"text":"write report"}}"#);
        assert_eq!(serde_json::to_string(&Command::Start).unwrap(), r#""Start""#);
    }

    #[test]
    fn status_response_parses() {
        let json = r#"{"Status":{"phase":"ShortBreak","seconds_remaining":300,"is_running":false,"completed_work_sessions":1}}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(
            response,
            Response::Status(TimerState {
                phase: Phase::ShortBreak,
                seconds_remaining: 300,
                is_running: false,
                completed_work_sessions: 1,
            })
        );
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Work.label(), "Focus");
        assert_eq!(Phase::LongBreak.label(), "Break");
        assert_eq!(Phase::ShortBreak.name(), "Short Break");
        assert!(Phase::ShortBreak.is_break());
        assert!(!Phase::Work.is_break());
    }

    #[tokio::test]
    async fn missing_socket_is_connection_refused() {
        let err = send_command_to("/tmp/pomodesk-test-no-such.sock", &Command::Status)
            .await
            .unwrap_err();
        assert!(matches!(err, IpcError::ConnectionRefused));
    }
}
