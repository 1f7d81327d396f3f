use class_reminder::format::format_time_display;
use class_reminder::schedule::{ScheduleEntry, SortKey};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::theme;

const COLUMNS: [(&str, Option<SortKey>); 6] = [
    ("Day", Some(SortKey::Day)),
    ("Time", Some(SortKey::Time)),
    ("Name", Some(SortKey::Name)),
    ("Location", None),
    ("Type", Some(SortKey::Kind)),
    ("Reminder", None),
];

pub struct ScheduleTable;

impl ScheduleTable {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        entries: &[ScheduleEntry],
        selected: usize,
        sort_key: SortKey,
    ) {
        let t = theme::current();
        let count = entries.len();
        let block = Block::default()
            .title(" Schedule ")
            .title_style(t.header)
            .title_bottom(Line::from(Span::styled(
                format!(" {} entr{} ", count, if count == 1 { "y" } else { "ies" }),
                t.dim,
            )))
            .borders(Borders::ALL)
            .border_style(t.border);

        if entries.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("Nothing scheduled yet. Press n to add a class.").style(t.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let header = Row::new(COLUMNS.iter().map(|(name, key)| {
            if *key == Some(sort_key) {
                Cell::from(format!("{} \u{25bc}", name)).style(t.highlight)
            } else {
                Cell::from(name.to_string())
            }
        }))
        .style(t.header.add_modifier(Modifier::UNDERLINED));

        let rows = entries.iter().map(entry_row);

        let widths = [
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(14),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(t.selected);

        let mut state = TableState::default().with_selected(Some(selected.min(count - 1)));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn entry_row(entry: &ScheduleEntry) -> Row<'static> {
    let t = theme::current();

    // Date-bound entries show their due date in the day column.
    let day = entry
        .day
        .clone()
        .or_else(|| entry.due_date.clone())
        .unwrap_or_default();

    let time = match entry.time.as_deref() {
        Some(raw) => format_time_display(raw),
        None => "--".to_string(),
    };
    let time_style = if entry.time.is_some() && entry.parsed_time().is_none() {
        Style::default().fg(ratatui::style::Color::Red)
    } else {
        Style::default()
    };

    let name = match entry.course.as_deref() {
        Some(course) if entry.kind.is_date_bound() => format!("{} ({})", entry.name, course),
        _ => entry.name.clone(),
    };

    let reminder_style = if entry.reminder_minutes().is_some() {
        Style::default()
    } else {
        t.dim
    };

    Row::new(vec![
        Cell::from(day),
        Cell::from(Span::styled(time, time_style)),
        Cell::from(name),
        Cell::from(entry.location.clone().unwrap_or_default()),
        Cell::from(entry.kind.label()),
        Cell::from(Span::styled(entry.reminder_display(), reminder_style)),
    ])
}
