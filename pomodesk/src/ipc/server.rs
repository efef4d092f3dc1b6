//! Unix domain socket server for IPC
//!
//! The server never touches application state. Each command is queued for
//! the terminal event loop together with a oneshot channel for the reply, so
//! the loop stays the only writer of the timer.

use anyhow::{Context, Result};
use pomodesk_ipc::{Command, Response};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// A command waiting for the event loop, plus where to send the answer.
pub struct Request {
    pub command: Command,
    pub reply: oneshot::Sender<Response>,
}

/// Bind `socket_path` and serve it from a background thread.
pub fn spawn(socket_path: &Path, queue: Sender<Request>) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build IPC runtime")?;
    let listener = {
        let _guard = runtime.enter();
        bind(socket_path)?
    };
    let handle = std::thread::Builder::new()
        .name("pomodesk-ipc".to_string())
        .spawn(move || runtime.block_on(serve(listener, queue)))
        .context("Failed to spawn IPC thread")?;
    Ok(handle)
}

fn bind(socket_path: &Path) -> Result<UnixListener> {
    // Remove old socket if it exists
    let _ = std::fs::remove_file(socket_path);

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("Failed to bind IPC socket {:?}", socket_path))?;
    info!("IPC server listening on {:?}", socket_path);
    Ok(listener)
}

async fn serve(listener: UnixListener, queue: Sender<Request>) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let queue = queue.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, queue).await {
                        error!("Error handling client: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, queue: Sender<Request>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;
    let response = match serde_json::from_str::<Command>(&line) {
        Ok(command) => {
            debug!(?command, "IPC command");
            dispatch(command, &queue).await
        }
        Err(e) => Response::Error(format!("invalid command: {}", e)),
    };

    let mut response_json = serde_json::to_vec(&response)?;
    response_json.push(b'\n');
    writer.write_all(&response_json).await?;
    writer.flush().await?;

    Ok(())
}

async fn dispatch(command: Command, queue: &Sender<Request>) -> Response {
    let (reply, answer) = oneshot::channel();
    if queue.send(Request { command, reply }).is_err() {
        return Response::Error("pomodesk is shutting down".to_string());
    }
    answer
        .await
        .unwrap_or_else(|_| Response::Error("pomodesk is shutting down".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodesk_ipc::{send_command_to, Phase, TimerState};
    use std::sync::mpsc;

    fn fake_event_loop(requests: mpsc::Receiver<Request>) {
        std::thread::spawn(move || {
            for request in requests {
                let response = match request.command {
                    Command::Status => Response::Status(TimerState {
                        phase: Phase::Work,
                        seconds_remaining: 1500,
                        is_running: false,
                        completed_work_sessions: 0,
                    }),
                    _ => Response::Ok,
                };
                let _ = request.reply.send(response);
            }
        });
    }

    #[tokio::test]
    async fn commands_round_trip_through_the_queue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomodesk.sock");
        let (tx, rx) = mpsc::channel();
        fake_event_loop(rx);

        let listener = bind(&path).unwrap();
        tokio::spawn(serve(listener, tx));

        let socket = path.to_str().unwrap();
        let response = send_command_to(socket, &Command::Status).await.unwrap();
        assert!(matches!(
            response,
            Response::Status(TimerState {
                seconds_remaining: 1500,
                ..
            })
        ));
        let response = send_command_to(socket, &Command::Start).await.unwrap();
        assert_eq!(response, Response::Ok);
    }

    #[tokio::test]
    async fn stopped_event_loop_reports_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomodesk.sock");
        let (tx, rx) = mpsc::channel::<Request>();
        drop(rx);

        let listener = bind(&path).unwrap();
        tokio::spawn(serve(listener, tx));

        let response = send_command_to(path.to_str().unwrap(), &Command::Reset)
            .await
            .unwrap();
        assert!(matches!(response, Response::Error(_)));
    }
}
