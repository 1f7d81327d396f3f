use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::InputMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        today: NaiveDate,
        entry_count: usize,
        mode: InputMode,
        message: Option<&str>,
    ) {
        let style = theme::current().status;
        let w = area.width as usize;

        let left = if w >= 60 {
            format!(
                " Today is {} | {} entries scheduled ",
                today.format("%A, %B %d"),
                entry_count
            )
        } else {
            format!(" {} | {} ", today.format("%a %b %d"), entry_count)
        };

        let right = match (message, mode) {
            (Some(msg), _) => format!(" {} ", msg),
            (None, InputMode::Form) => " Tab:Next Enter:Save Esc:Cancel ".to_string(),
            (None, InputMode::Prompt) => " Enter:Set Esc:Cancel ".to_string(),
            (None, InputMode::Normal) if w >= 100 => {
                " jk:Move n:Class a:Assign x:Exam e:Edit d:Del m:Remind s:Sort ?:Help q:Quit ".to_string()
            }
            (None, InputMode::Normal) if w >= 60 => " n:New e:Edit d:Del m:Remind ?:Help q:Quit ".to_string(),
            (None, InputMode::Normal) => " ?:Help q:Quit ".to_string(),
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
