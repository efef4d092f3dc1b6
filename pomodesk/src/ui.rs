use crate::app::{App, AppMode, SettingsForm};
use crate::sound::AudioBackend;
use crate::timer::PhaseChange;
use pomodesk_ipc::Phase;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame,
};

pub fn draw<B: AudioBackend>(f: &mut Frame, app: &App<B>) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_timer(f, chunks[1], app);
    draw_tasks(f, chunks[2], app);
    draw_sound(f, chunks[3], app);
    draw_status_bar(f, chunks[4], app);

    match &app.mode {
        AppMode::AddingTask => draw_input_overlay(f, "New Task", &app.input_buffer, app),
        AppMode::EditingSettings => draw_settings_overlay(f, &app.settings_form, app),
        AppMode::Normal => {}
    }
    if let Some(change) = app.timer.notifier().alert() {
        draw_alert_overlay(f, change, app);
    }
}

fn phase_color<B>(phase: Phase, app: &App<B>) -> Color {
    let theme = &app.config.theme;
    match phase {
        Phase::Work => theme.red,
        Phase::ShortBreak => theme.green,
        Phase::LongBreak => theme.blue,
    }
}

fn draw_header<B>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "POMODESK",
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.black)),
        ),
        area,
    );
}

fn draw_timer<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let timer = &app.timer;
    let readout = timer.display().readout();
    let color = phase_color(timer.phase(), app);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} {} ", icons.timer, timer.phase().name()),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let state_icon = if timer.is_running() {
        &icons.play
    } else {
        &icons.pause
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", state_icon), Style::default().fg(color)),
            Span::styled(
                readout.clock_face(),
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", readout.label()),
                Style::default().fg(theme.gray),
            ),
        ]))
        .alignment(Alignment::Center),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(app.status())
            .style(Style::default().fg(theme.yellow))
            .alignment(Alignment::Center),
        rows[1],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color).bg(theme.black))
            .percent((timer.progress() * 100.0) as u16),
        rows[2],
    );
    let interval = timer.settings().long_break_interval.max(1);
    let done = timer.completed_work_sessions();
    f.render_widget(
        Paragraph::new(format!(
            "Sessions: {}  ·  next long break in {}",
            done,
            interval - done % interval
        ))
        .style(Style::default().fg(theme.gray))
        .alignment(Alignment::Center),
        rows[3],
    );
}

fn draw_tasks<B>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Tasks ", icons.task_list),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    if app.tasks.is_empty() {
        f.render_widget(
            Paragraph::new("No tasks. Press 'a' to add one.")
                .style(Style::default().fg(theme.gray))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }
    let constraints: Vec<Constraint> = app
        .tasks
        .tasks()
        .iter()
        .map(|_| Constraint::Length(1))
        .collect();
    let task_chunks = Layout::default().constraints(constraints).split(inner_area);
    for (i, task) in app.tasks.tasks().iter().enumerate() {
        if let Some(item_area) = task_chunks.get(i) {
            let selected = i == app.selected_task;
            let line = Line::from(vec![
                if selected {
                    Span::styled(icons.select.clone(), Style::default().fg(theme.selection))
                } else {
                    Span::raw(" ")
                },
                Span::raw(format!(
                    " {} ",
                    if task.completed {
                        &icons.done
                    } else {
                        &icons.pending
                    }
                )),
                Span::styled(
                    task.text.clone(),
                    if task.completed {
                        Style::default()
                            .fg(theme.gray)
                            .add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default().fg(theme.foreground)
                    },
                ),
            ]);
            let style = if selected {
                Style::default().bg(theme.black)
            } else {
                Style::default()
            };
            f.render_widget(Paragraph::new(line).style(style), *item_area);
        }
    }
}

fn draw_sound<B: AudioBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let sound = &app.sound;
    let state = if sound.is_playing() {
        Span::styled(icons.play.clone(), Style::default().fg(theme.green))
    } else {
        Span::styled(icons.pause.clone(), Style::default().fg(theme.gray))
    };
    let line = Line::from(vec![
        state,
        Span::raw(format!(" {} ", sound.kind())),
        Span::styled(
            format!("vol {:>3.0}%", sound.volume() * 100.0),
            Style::default().fg(theme.gray),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .title(Span::styled(
                    format!(" {} Ambience ", icons.sound),
                    Style::default().fg(theme.gray),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.magenta)),
        ),
        area,
    );
}

fn draw_status_bar<B>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("NORMAL", theme.green),
        AppMode::AddingTask => ("INSERT", theme.yellow),
        AppMode::EditingSettings => ("SETTINGS", theme.blue),
    };
    let help = if app.timer.notifier().alert().is_some() {
        "enter:continue"
    } else if app.mode == AppMode::Normal {
        "space:start/pause │ r:reset │ s:settings │ a:add │ x:done │ d:del │ m:sound │ n:next │ +/-:vol │ q:quit"
    } else if app.mode == AppMode::EditingSettings {
        "tab:next field │ enter:save │ esc:cancel"
    } else {
        "enter:confirm │ esc:cancel"
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", mode_text),
                Style::default()
                    .bg(mode_color)
                    .fg(theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(help),
        ]))
        .block(Block::default().style(Style::default().bg(theme.black).fg(theme.gray))),
        area,
    );
}

fn draw_input_overlay<B>(f: &mut Frame, title: &str, input: &str, app: &App<B>) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.theme.yellow))
        .border_type(BorderType::Double)
        .style(Style::default().bg(app.config.theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(app.config.theme.foreground)),
            Span::styled(input, Style::default().fg(app.config.theme.foreground)),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(app.config.theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn draw_settings_overlay<B>(f: &mut Frame, form: &SettingsForm, app: &App<B>) {
    let theme = &app.config.theme;
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = SettingsForm::LABELS
        .iter()
        .zip(form.fields.iter())
        .enumerate()
        .map(|(i, (label, value))| {
            let focused = i == form.focus;
            let mut spans = vec![
                Span::styled(
                    if focused { "▸ " } else { "  " },
                    Style::default().fg(theme.selection),
                ),
                Span::styled(format!("{:<30}", label), Style::default().fg(theme.gray)),
                Span::styled(value.clone(), Style::default().fg(theme.foreground)),
            ];
            if focused {
                spans.push(Span::styled(
                    app.config.icons.input_cursor.clone(),
                    Style::default()
                        .fg(theme.foreground)
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            Line::from(spans)
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Settings ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.blue))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn draw_alert_overlay<B>(f: &mut Frame, change: &PhaseChange, app: &App<B>) {
    let theme = &app.config.theme;
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                change.message(),
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press enter to continue",
                Style::default().fg(theme.gray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(format!(" {} finished ", change.completed.name()))
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(phase_color(change.next, app)))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
