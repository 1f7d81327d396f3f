mod app;
mod components;
mod event;
mod theme;
mod tui;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use app::{App, InputMode};
use class_reminder::conflict::ConflictChecker;
use class_reminder::reminder::ReminderPoller;
use class_reminder::schedule::{EntryKind, ScheduleStore};
use class_reminder::Config;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FIRED_CHANNEL_CAPACITY: usize = 64;
const KEY_POLL: Duration = Duration::from_millis(200);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config_path = Config::default_path();
    let (config, config_err) = match config_path.as_deref().map(Config::load) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (Config::default(), Some(e)),
        None => (Config::default(), None),
    };

    init_logging(&config.log_file())?;
    if let Some(e) = config_err {
        warn!("{e}; using defaults");
    }
    info!(data_file = %config.data_file().display(), "starting");

    theme::init(&config.theme);

    let store = ScheduleStore::open(config.data_file()).into_shared();
    let (fired_tx, fired_rx) = mpsc::channel(FIRED_CHANNEL_CAPACITY);
    let poller = ReminderPoller::new(store.clone(), fired_tx)
        .interval(config.poll_interval())
        .spawn();

    let checker = ConflictChecker::new(config.class_duration_minutes());
    let mut app = App::new(store, fired_rx, checker);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    let clean = poller.shutdown(config.shutdown_timeout()).await;
    info!(clean, "exiting");
    result
}

/// Route `tracing` output to a file so it never draws over the terminal UI.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("class_reminder=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.drain_reminders();

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

            render_main(frame, layout[0], app);

            if let Some(ref form) = app.form_state {
                components::EntryForm::render(frame, area, form);
            }
            if let Some(ref prompt) = app.prompt {
                components::render_reminder_prompt(frame, area, prompt);
            }
            if let Some(due) = app.popups.front() {
                components::render_reminder_popup(frame, area, due, app.popups.len());
            }
            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(
                frame,
                layout[1],
                app.today,
                app.rows.len(),
                app.input_mode(),
                app.status_message.as_deref(),
            );
        })?;

        if let Some(key) = event::next_key_event(KEY_POLL).await? {
            app.status_message = None;

            if app.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                    app.show_help = false;
                }
                continue;
            }

            // Reminder pop-ups are modal and come off the queue one at a time.
            if !app.popups.is_empty() {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    app.dismiss_popup();
                }
                continue;
            }

            match app.input_mode() {
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::Prompt => handle_prompt_input(app, key.code),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn render_main(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    if area.width < 80 {
        components::ScheduleTable::render(frame, area, &app.rows, app.selected, app.sort_key);
        return;
    }

    let side_w = if area.width >= 120 { 36 } else { 28 };
    let content = Layout::horizontal([Constraint::Min(40), Constraint::Length(side_w)]).split(area);

    components::ScheduleTable::render(frame, content[0], &app.rows, app.selected, app.sort_key);
    components::UpcomingList::render(frame, content[1], &app.upcoming, app.today);
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_prev(),
        (KeyCode::Home, _) | (KeyCode::Char('g'), _) => app.select_first(),
        (KeyCode::End, _) | (KeyCode::Char('G'), _) => app.select_last(),
        (KeyCode::Char('n'), _) => app.open_form(EntryKind::Class),
        (KeyCode::Char('a'), _) => app.open_form(EntryKind::Assignment),
        (KeyCode::Char('x'), _) => app.open_form(EntryKind::Exam),
        (KeyCode::Char('e'), _) | (KeyCode::Enter, _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => app.delete_selected(),
        (KeyCode::Char('m'), _) => app.open_reminder_prompt(),
        (KeyCode::Char('s'), _) => app.cycle_sort(),
        (KeyCode::Char('r'), _) => {
            app.refresh();
            app.status_message = Some("Schedule refreshed".to_string());
        }
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_tab(),
        KeyCode::BackTab | KeyCode::Up => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn handle_prompt_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => app.prompt_backspace(),
        KeyCode::Char(c) => app.prompt_input_char(c),
        _ => {}
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let t = theme::current();
    let popup_w = area.width.clamp(30, 52).min(area.width);
    let popup_h = area.height.clamp(12, 24).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(t.accent).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        key("j/k", "Next / previous entry"),
        key("g/G", "First / last entry"),
        key("s", "Cycle sort column"),
        Line::from(""),
        Line::from(Span::styled("Entries", section_style)),
        key("n", "Add class"),
        key("a", "Add assignment"),
        key("x", "Add exam"),
        key("e/Enter", "Edit selected"),
        key("d", "Delete selected"),
        key("m", "Set reminder (1-120 min)"),
        key("r", "Refresh"),
        Line::from(""),
        Line::from(Span::styled("Forms", section_style)),
        key("Tab", "Next field"),
        key("Enter", "Save"),
        key("Esc", "Cancel / dismiss"),
        Line::from(""),
        key("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
