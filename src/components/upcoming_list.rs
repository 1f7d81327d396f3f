use chrono::NaiveDate;
use class_reminder::schedule::{EntryKind, ScheduleEntry};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::theme;

/// Side panel listing assignments and exams that are not yet past due.
pub struct UpcomingList;

impl UpcomingList {
    pub fn render(frame: &mut Frame, area: Rect, upcoming: &[ScheduleEntry], today: NaiveDate) {
        let t = theme::current();
        let w = area.width as usize;

        let title = if w >= 22 {
            format!(" Upcoming ({}) ", upcoming.len())
        } else {
            " Upcoming ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(t.header)
            .borders(Borders::ALL)
            .border_style(t.border);

        if upcoming.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No upcoming deadlines").style(t.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let mut items: Vec<ListItem> = Vec::new();

        for entry in upcoming {
            let Some(due) = entry.parsed_due_date() else {
                continue;
            };

            let marker = match entry.kind {
                EntryKind::Exam => Span::styled(" E ", Style::default().fg(t.alert).add_modifier(Modifier::BOLD)),
                _ => Span::styled(" A ", Style::default().fg(t.accent)),
            };

            let date_str = if due == today {
                "today".to_string()
            } else {
                due.format("%b %d").to_string()
            };
            let date_style = if due == today {
                t.today
            } else {
                t.dim
            };

            let title_w = inner_w.saturating_sub(3 + date_str.len() + 1);
            items.push(ListItem::new(Line::from(vec![
                marker,
                Span::raw(format!("{:<width$}", truncate(&entry.name, title_w), width = title_w)),
                Span::raw(" "),
                Span::styled(date_str, date_style),
            ])));
        }

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Physics", 10), "Physics");
        assert_eq!(truncate("Thermodynamics", 8), "Therm...");
        assert_eq!(truncate("Übungsblatt", 5), "Üb...");
        assert_eq!(truncate("abc", 2), "ab");
    }
}
