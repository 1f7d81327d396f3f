use class_reminder::format::format_time_display;
use class_reminder::reminder::ReminderDue;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

use crate::theme;

fn centered(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let w = area.width.min(max_w).max(24.min(area.width));
    let h = area.height.min(max_h);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Pop-up for the oldest pending reminder.
pub fn render_reminder_popup(frame: &mut Frame, area: Rect, due: &ReminderDue, pending: usize) {
    let t = theme::current();
    let popup_area = centered(area, 56, 10);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Reminder ")
        .title_style(Style::default().fg(t.alert).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.alert));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", due.kind), t.dim),
            Span::styled(due.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Starts: ", t.dim),
            Span::raw(format_time_display(&due.time)),
        ]),
    ];

    if let Some(loc) = due.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("Location: ", t.dim),
            Span::raw(loc.to_string()),
        ]));
    }

    lines.push(Line::from(""));
    let more = if pending > 1 {
        format!(" ({} more)", pending - 1)
    } else {
        String::new()
    };
    lines.push(Line::from(Span::styled(
        format!("Enter/Esc to dismiss{}", more),
        t.dim,
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

/// Minutes prompt for the "set reminder" action.
#[derive(Debug, Clone)]
pub struct ReminderPrompt {
    pub entry_id: Uuid,
    pub name: String,
    pub input: String,
    pub error: Option<String>,
}

impl ReminderPrompt {
    pub fn new(entry_id: Uuid, name: &str, current: Option<u32>) -> Self {
        Self {
            entry_id,
            name: name.to_string(),
            input: current.map(|m| m.to_string()).unwrap_or_default(),
            error: None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.error = None;
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        self.input.pop();
    }
}

pub fn render_reminder_prompt(frame: &mut Frame, area: Rect, prompt: &ReminderPrompt) {
    let t = theme::current();
    let popup_area = centered(area, 48, 7);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Set Reminder ")
        .title_style(Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(format!("How many minutes before {}?", prompt.name)),
        Line::from(vec![
            Span::styled("> ", t.dim),
            Span::styled(
                format!("{}_", prompt.input),
                Style::default().fg(ratatui::style::Color::Cyan),
            ),
            Span::styled("  (1-120)", t.dim),
        ]),
    ];
    if let Some(err) = &prompt.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(ratatui::style::Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
