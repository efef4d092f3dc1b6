use crate::alerts::AppNotifier;
use crate::config::Config;
use crate::display::TerminalDisplay;
use crate::settings::Settings;
use crate::sound::{AudioBackend, DefaultBackend, SoundKind, SoundPlayer};
use crate::tasks::TaskList;
use crate::timer::{IntervalClock, Timer};
use crossterm::event::KeyCode;
use pomodesk_ipc::{Command, Response};
use tracing::info;

pub type AppTimer = Timer<IntervalClock, AppNotifier, TerminalDisplay>;

const VOLUME_STEP: f32 = 0.1;

pub struct App<B = DefaultBackend> {
    pub timer: AppTimer,
    pub tasks: TaskList,
    pub sound: SoundPlayer<B>,
    pub selected_task: usize,
    pub mode: AppMode,
    pub input_buffer: String,
    pub settings_form: SettingsForm,
    pub config: Config,
    pub should_quit: bool,
}

#[derive(Default, Clone, PartialEq, Debug)]
pub enum AppMode {
    #[default]
    Normal,
    AddingTask,
    EditingSettings,
}

/// Text fields of the settings overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub fields: [String; 4],
    pub focus: usize,
}

impl SettingsForm {
    pub const LABELS: [&'static str; 4] = [
        "Work (minutes)",
        "Short break (minutes)",
        "Long break (minutes)",
        "Long break every N sessions",
    ];

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            fields: [
                settings.work_minutes.to_string(),
                settings.short_break_minutes.to_string(),
                settings.long_break_minutes.to_string(),
                settings.long_break_interval.to_string(),
            ],
            focus: 0,
        }
    }

    pub fn settings(&self) -> Settings {
        let [work, short_break, long_break, interval] = &self.fields;
        Settings::from_inputs(work, short_break, long_break, interval)
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn push(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.fields[self.focus].push(c);
        }
    }

    fn pop(&mut self) {
        self.fields[self.focus].pop();
    }
}

impl<B: AudioBackend> App<B> {
    pub fn new(config: Config, tasks: TaskList, sound: SoundPlayer<B>, set_title: bool) -> Self {
        let timer = Timer::new(
            config.settings(),
            IntervalClock::new(),
            AppNotifier::new(config.notifications.desktop),
            TerminalDisplay::new(set_title),
        );
        Self {
            timer,
            tasks,
            sound,
            selected_task: 0,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            settings_form: SettingsForm::default(),
            config,
            should_quit: false,
        }
    }

    /// Deliver elapsed clock ticks to the timer.
    pub fn update(&mut self) {
        self.timer.pump_clock();
    }

    pub fn status(&self) -> &'static str {
        self.timer.notifier().status()
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.timer.notifier_mut().reset_status();
    }

    pub fn save_settings(&mut self) {
        let settings = self.settings_form.settings();
        info!(?settings, "settings saved");
        if self.timer.apply_settings_and_refresh(settings) {
            self.timer.notifier_mut().reset_status();
        }
        self.mode = AppMode::Normal;
    }

    pub fn add_task(&mut self, text: &str) {
        if self.tasks.add(text).is_some() {
            self.selected_task = self.tasks.len() - 1;
        }
    }

    pub fn delete_selected_task(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.tasks.delete(id);
            self.clamp_selection();
        }
    }

    pub fn toggle_selected_task(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.tasks.toggle(id);
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if !self.tasks.is_empty() {
            self.selected_task = (self.selected_task + 1).min(self.tasks.len() - 1);
        }
    }

    pub fn change_volume(&mut self, delta: f32) {
        let volume = ((self.sound.volume() + delta) * 10.0).round() / 10.0;
        self.sound.set_volume(volume);
    }

    fn selected_task_id(&self) -> Option<i64> {
        self.tasks.tasks().get(self.selected_task).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        if !self.tasks.is_empty() && self.selected_task >= self.tasks.len() {
            self.selected_task = self.tasks.len() - 1;
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        // A completion alert blocks everything until acknowledged.
        if self.timer.notifier().alert().is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.timer.notifier_mut().dismiss();
            }
            return;
        }

        match self.mode {
            AppMode::Normal => match code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char(' ') => self.timer.toggle(),
                KeyCode::Char('r') => self.reset_timer(),
                KeyCode::Char('s') => {
                    self.settings_form = SettingsForm::from_settings(self.timer.settings());
                    self.mode = AppMode::EditingSettings;
                }
                KeyCode::Char('a') => {
                    self.mode = AppMode::AddingTask;
                    self.input_buffer.clear();
                }
                KeyCode::Char('x') => self.toggle_selected_task(),
                KeyCode::Char('d') => self.delete_selected_task(),
                KeyCode::Char('m') => {
                    self.sound.toggle();
                }
                KeyCode::Char('n') => self.sound.set_kind(self.sound.kind().next()),
                KeyCode::Char('+') | KeyCode::Char('=') => self.change_volume(VOLUME_STEP),
                KeyCode::Char('-') => self.change_volume(-VOLUME_STEP),
                KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
                KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
                _ => {}
            },
            AppMode::AddingTask => match code {
                KeyCode::Esc => {
                    self.mode = AppMode::Normal;
                    self.input_buffer.clear();
                }
                KeyCode::Enter => {
                    let text = std::mem::take(&mut self.input_buffer);
                    self.add_task(&text);
                    self.mode = AppMode::Normal;
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Char(c) => self.input_buffer.push(c),
                _ => {}
            },
            AppMode::EditingSettings => match code {
                KeyCode::Esc => self.mode = AppMode::Normal,
                KeyCode::Enter => self.save_settings(),
                KeyCode::Tab | KeyCode::Down => self.settings_form.next_field(),
                KeyCode::BackTab | KeyCode::Up => self.settings_form.prev_field(),
                KeyCode::Backspace => self.settings_form.pop(),
                KeyCode::Char(c) => self.settings_form.push(c),
                _ => {}
            },
        }
    }

    /// Apply a command that arrived over the control socket.
    pub fn handle_command(&mut self, command: Command) -> Response {
        match command {
            Command::Start => {
                self.timer.start();
                Response::Ok
            }
            Command::Pause => {
                self.timer.pause();
                Response::Ok
            }
            Command::Toggle => {
                self.timer.toggle();
                Response::Ok
            }
            Command::Reset => {
                self.reset_timer();
                Response::Ok
            }
            Command::Status => Response::Status(self.timer.state()),
            Command::AddTask { text } => match self.tasks.add(&text) {
                Some(_) => Response::Ok,
                None => Response::Error("task text is empty".to_string()),
            },
            Command::ListTasks => Response::Tasks(self.tasks.entries()),
            Command::ToggleTask { id } => {
                if self.tasks.toggle(id) {
                    Response::Ok
                } else {
                    Response::Error(format!("no task with id {}", id))
                }
            }
            Command::DeleteTask { id } => {
                if self.tasks.delete(id) {
                    self.clamp_selection();
                    Response::Ok
                } else {
                    Response::Error(format!("no task with id {}", id))
                }
            }
            Command::ToggleSound => {
                self.sound.toggle();
                Response::Sound(self.sound.status())
            }
            Command::SetSound { kind } => match kind.parse::<SoundKind>() {
                Ok(kind) => {
                    self.sound.set_kind(kind);
                    Response::Sound(self.sound.status())
                }
                Err(e) => Response::Error(e),
            },
            Command::SetVolume { volume } => {
                self.sound.set_volume(volume);
                Response::Sound(self.sound.status())
            }
        }
    }
}
