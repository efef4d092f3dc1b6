use anyhow::Result;
use clap::{Parser, Subcommand};
use pomodesk_ipc::{send_command, Command, Response};

#[derive(Parser)]
#[command(name = "pomodeskctl")]
#[command(about = "Control the pomodesk timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start or pause, whichever applies
    Toggle,
    /// Back to a fresh work phase
    Reset,
    /// Get timer status
    Status,
    /// Manage the task list
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Control the ambient sound
    Sound {
        #[command(subcommand)]
        action: SoundAction,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Add a new task
    Add { text: String },
    /// List all tasks
    List,
    /// Toggle a task's completed flag
    Done { id: i64 },
    /// Delete a task
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum SoundAction {
    /// Start or stop the ambient track
    Toggle,
    /// Switch track (rain, cafe)
    Use { kind: String },
    /// Set volume between 0.0 and 1.0
    Volume { volume: f32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Convert CLI command to IPC command
    let command = match cli.command {
        Commands::Start => Command::Start,
        Commands::Pause => Command::Pause,
        Commands::Toggle => Command::Toggle,
        Commands::Reset => Command::Reset,
        Commands::Status => Command::Status,
        Commands::Task { action } => match action {
            TaskAction::Add { text } => Command::AddTask { text },
            TaskAction::List => Command::ListTasks,
            TaskAction::Done { id } => Command::ToggleTask { id },
            TaskAction::Rm { id } => Command::DeleteTask { id },
        },
        Commands::Sound { action } => match action {
            SoundAction::Toggle => Command::ToggleSound,
            SoundAction::Use { kind } => Command::SetSound { kind },
            SoundAction::Volume { volume } => Command::SetVolume { volume },
        },
    };

    let response = send_command(&command).await?;

    match response {
        Response::Ok => println!("OK"),
        Response::Status(state) => {
            let state_label = if state.is_running { "running" } else { "stopped" };
            println!("Phase: {} ({})", state.phase.name(), state_label);
            println!(
                "Remaining: {:02}:{:02}",
                state.seconds_remaining / 60,
                state.seconds_remaining % 60
            );
            println!("Sessions: {}", state.completed_work_sessions);
        }
        Response::Tasks(tasks) => {
            for task in tasks {
                let check = if task.completed { "✓" } else { " " };
                println!("[{}] {}: {}", check, task.id, task.text);
            }
        }
        Response::Sound(sound) => {
            let playing = if sound.playing { "playing" } else { "stopped" };
            println!("{} ({}) at {:.0}%", sound.kind, playing, sound.volume * 100.0);
        }
        Response::Error(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
