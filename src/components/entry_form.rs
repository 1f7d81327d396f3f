use class_reminder::format::TIME_FORMAT;
use class_reminder::schedule::{EntryDraft, EntryKind, ScheduleEntry};
use class_reminder::validate::{
    parse_reminder_offset, validate_assignment_input, validate_class_input, validate_exam_input,
    validate_optional_time, InputError,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Day,
    Time,
    Name,
    Course,
    DueDate,
    Location,
    Reminder,
}

const CLASS_FIELDS: [FormField; 5] = [
    FormField::Day,
    FormField::Time,
    FormField::Name,
    FormField::Location,
    FormField::Reminder,
];

const DATED_FIELDS: [FormField; 6] = [
    FormField::Course,
    FormField::Name,
    FormField::DueDate,
    FormField::Time,
    FormField::Location,
    FormField::Reminder,
];

#[derive(Debug, Clone)]
pub struct EntryFormState {
    pub kind: EntryKind,
    /// Set when editing an existing entry.
    pub editing: Option<Uuid>,
    pub day: String,
    pub time: String,
    pub name: String,
    pub course: String,
    pub due_date: String,
    pub location: String,
    pub reminder: String,
    pub active_field: FormField,
    pub error: Option<String>,
}

impl EntryFormState {
    pub fn new(kind: EntryKind) -> Self {
        let mut state = Self {
            kind,
            editing: None,
            day: String::new(),
            time: String::new(),
            name: String::new(),
            course: String::new(),
            due_date: String::new(),
            location: String::new(),
            reminder: String::new(),
            active_field: FormField::Day,
            error: None,
        };
        state.active_field = state.fields()[0];
        state
    }

    pub fn edit(entry: &ScheduleEntry) -> Self {
        let mut state = Self::new(entry.kind);
        state.editing = Some(entry.id);
        state.day = entry.day.clone().unwrap_or_default();
        state.time = entry.time.clone().unwrap_or_default();
        state.name = entry.name.clone();
        state.course = entry.course.clone().unwrap_or_default();
        state.due_date = entry.due_date.clone().unwrap_or_default();
        state.location = entry.location.clone().unwrap_or_default();
        state.reminder = entry
            .reminder_minutes()
            .map(|m| m.to_string())
            .unwrap_or_default();
        state
    }

    pub fn fields(&self) -> &'static [FormField] {
        match self.kind {
            EntryKind::Class => &CLASS_FIELDS,
            EntryKind::Assignment | EntryKind::Exam => &DATED_FIELDS,
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(idx + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(idx + fields.len() - 1) % fields.len()];
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Day => &mut self.day,
            FormField::Time => &mut self.time,
            FormField::Name => &mut self.name,
            FormField::Course => &mut self.course,
            FormField::DueDate => &mut self.due_date,
            FormField::Location => &mut self.location,
            FormField::Reminder => &mut self.reminder,
        }
    }

    fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Day => &self.day,
            FormField::Time => &self.time,
            FormField::Name => &self.name,
            FormField::Course => &self.course,
            FormField::DueDate => &self.due_date,
            FormField::Location => &self.location,
            FormField::Reminder => &self.reminder,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.error = None;
        self.value_mut(self.active_field).push(c);
    }

    pub fn backspace(&mut self) {
        self.error = None;
        self.value_mut(self.active_field).pop();
    }

    pub fn label(&self, field: FormField) -> &'static str {
        match (field, self.kind) {
            (FormField::Day, _) => "Day:",
            (FormField::Time, _) => "Time:",
            (FormField::Name, EntryKind::Class) => "Class:",
            (FormField::Name, EntryKind::Assignment) => "Title:",
            (FormField::Name, EntryKind::Exam) => "Exam:",
            (FormField::Course, _) => "Class:",
            (FormField::DueDate, EntryKind::Assignment) => "Due:",
            (FormField::DueDate, _) => "Date:",
            (FormField::Location, _) => "Room:",
            (FormField::Reminder, _) => "Remind:",
        }
    }

    fn placeholder(&self, field: FormField) -> &'static str {
        match field {
            FormField::Day => "Monday",
            FormField::Time if self.kind.is_date_bound() => "HH:MM (optional)",
            FormField::Time => "HH:MM",
            FormField::DueDate => "YYYY-MM-DD",
            FormField::Reminder => "minutes, 0 = none",
            _ => "",
        }
    }

    pub fn title(&self) -> String {
        let verb = if self.editing.is_some() { "Edit" } else { "New" };
        format!(" {} {} ", verb, self.kind)
    }

    /// Validate the fields and build a draft. Times are normalized to `HH:MM`.
    pub fn to_draft(&self) -> Result<EntryDraft, InputError> {
        let draft = match self.kind {
            EntryKind::Class => {
                let time = validate_class_input(&self.day, &self.time, &self.name)?;
                EntryDraft::class(&self.day, &time.format(TIME_FORMAT).to_string(), &self.name)
            }
            kind @ (EntryKind::Assignment | EntryKind::Exam) => {
                if kind == EntryKind::Assignment {
                    validate_assignment_input(&self.course, &self.name, &self.due_date)?;
                } else {
                    validate_exam_input(&self.course, &self.name, &self.due_date)?;
                }
                let time = validate_optional_time(&self.time)?
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .unwrap_or_default();
                EntryDraft::dated(kind, &self.course, &self.name, &self.due_date).with_time(&time)
            }
        };
        let reminder = parse_reminder_offset(&self.reminder)?;
        Ok(draft.with_location(&self.location).with_reminder(reminder))
    }
}

pub struct EntryForm;

impl EntryForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EntryFormState) {
        let fields = state.fields();
        let form_area = form_rect(area, fields.len());

        frame.render_widget(Clear, form_area);

        let accent = theme::current().accent;
        let block = Block::default()
            .title(state.title())
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(1)).collect();
        constraints.push(Constraint::Length(1)); // spacer
        constraints.push(Constraint::Length(2)); // error
        constraints.push(Constraint::Length(1)); // help
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        for (i, field) in fields.iter().enumerate() {
            render_field(
                frame,
                rows[i],
                state.label(*field),
                state.value(*field),
                state.placeholder(*field),
                state.active_field == *field,
            );
        }

        let n = fields.len();
        if let Some(err) = &state.error {
            let msg = Paragraph::new(err.as_str())
                .style(Style::default().fg(ratatui::style::Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, rows[n + 1]);
        }

        let dim = theme::current().dim;
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[n + 2]);
    }
}

/// Centered form box, never larger than `area`.
fn form_rect(area: Rect, field_count: usize) -> Rect {
    let w = area.width.clamp(30, 54).min(area.width);
    let h = (field_count as u16 + 6).max(8).min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    active: bool,
) {
    let dim = theme::current().dim;
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(format!("{:<8}", label), dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];
    if value.is_empty() && !placeholder.is_empty() {
        spans.push(Span::styled(format!(" {}", placeholder), dim));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
