use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod alerts;
mod app;
mod config;
mod display;
mod ipc;
mod persistence;
mod settings;
mod sound;
mod tasks;
mod timer;
mod ui;

use app::App;
use config::Config;
use persistence::TaskStore;
use pomodesk_ipc::SOCKET_PATH;
use sound::{AudioBackend, DefaultBackend, SoundPlayer};
use tasks::TaskList;

fn main() -> Result<()> {
    let data_dir = persistence::data_dir()?;
    init_logging(&data_dir);
    info!("Starting pomodesk v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config().unwrap_or_else(|e| {
        warn!("Using default configuration: {:#}", e);
        Config::default()
    });
    let tasks = TaskList::load(TaskStore::new(data_dir.join(persistence::TASKS_FILE)));
    let sound = SoundPlayer::new(
        DefaultBackend::default(),
        config.sound.tracks(&data_dir.join("sounds")),
        config.sound.kind,
        config.sound.volume,
    );
    let app = App::new(config, tasks, sound, true);

    let (queue, requests) = mpsc::channel();
    if let Err(e) = ipc::spawn(Path::new(SOCKET_PATH), queue) {
        warn!("Remote control disabled: {:#}", e);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, requests);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    let _ = std::fs::remove_file(SOCKET_PATH);

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    info!("pomodesk stopped");
    Ok(())
}

/// Log to a file in the data dir; stdout belongs to the terminal UI.
fn init_logging(data_dir: &Path) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("pomodesk.log"))
    {
        Ok(file) => file,
        Err(_) => return,
    };
    let filter = EnvFilter::try_from_env("POMODESK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("pomodesk=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app<T: Backend, B: AudioBackend>(
    terminal: &mut Terminal<T>,
    mut app: App<B>,
    requests: Receiver<ipc::Request>,
) -> Result<()> {
    loop {
        // Commands from pomodeskctl are applied here, in order, like key presses.
        while let Ok(request) = requests.try_recv() {
            let response = app.handle_command(request.command);
            let _ = request.reply.send(response);
        }
        app.update();

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            app.sound.stop();
            return Ok(());
        }
    }
}
