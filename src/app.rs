use std::collections::VecDeque;
use std::sync::MutexGuard;

use chrono::{Local, NaiveDate};
use class_reminder::conflict::ConflictChecker;
use class_reminder::reminder::ReminderDue;
use class_reminder::schedule::{EntryKind, ScheduleEntry, ScheduleStore, SharedStore, SortKey};
use class_reminder::validate::parse_reminder_minutes;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::components::{EntryFormState, ReminderPrompt};

const REMINDER_MIN: u32 = 1;
const REMINDER_MAX: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
    Prompt,
}

pub struct App {
    pub running: bool,
    pub today: NaiveDate,
    pub sort_key: SortKey,
    pub selected: usize,
    /// Sorted copy of the store, refreshed after every change.
    pub rows: Vec<ScheduleEntry>,
    pub upcoming: Vec<ScheduleEntry>,
    pub form_state: Option<EntryFormState>,
    pub prompt: Option<ReminderPrompt>,
    pub popups: VecDeque<ReminderDue>,
    pub status_message: Option<String>,
    pub show_help: bool,
    store: SharedStore,
    checker: ConflictChecker,
    fired_rx: mpsc::Receiver<ReminderDue>,
}

impl App {
    pub fn new(
        store: SharedStore,
        fired_rx: mpsc::Receiver<ReminderDue>,
        checker: ConflictChecker,
    ) -> Self {
        let mut app = Self {
            running: true,
            today: Local::now().date_naive(),
            sort_key: SortKey::default(),
            selected: 0,
            rows: Vec::new(),
            upcoming: Vec::new(),
            form_state: None,
            prompt: None,
            popups: VecDeque::new(),
            status_message: None,
            show_help: false,
            store,
            checker,
            fired_rx,
        };
        app.refresh();
        app
    }

    pub fn input_mode(&self) -> InputMode {
        if self.form_state.is_some() {
            InputMode::Form
        } else if self.prompt.is_some() {
            InputMode::Prompt
        } else {
            InputMode::Normal
        }
    }

    fn store(&self) -> MutexGuard<'_, ScheduleStore> {
        match self.store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Re-read the table rows and upcoming panel from the store.
    pub fn refresh(&mut self) {
        self.today = Local::now().date_naive();
        let (rows, upcoming) = {
            let store = self.store();
            let rows: Vec<ScheduleEntry> = store.sorted(self.sort_key).into_iter().cloned().collect();
            let upcoming: Vec<ScheduleEntry> =
                store.upcoming(self.today).into_iter().cloned().collect();
            (rows, upcoming)
        };
        self.rows = rows;
        self.upcoming = upcoming;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    fn selected_entry(&self) -> Option<&ScheduleEntry> {
        self.rows.get(self.selected)
    }

    fn select_id(&mut self, id: uuid::Uuid) {
        if let Some(idx) = self.rows.iter().position(|e| e.id == id) {
            self.selected = idx;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn cycle_sort(&mut self) {
        let current = self.selected_entry().map(|e| e.id);
        self.sort_key = self.sort_key.next();
        self.refresh();
        if let Some(id) = current {
            self.select_id(id);
        }
        self.status_message = Some(format!("Sorted by {}", self.sort_key.label()));
    }

    // ── Reminders ──

    /// Pull fired reminders off the channel, persist their flags and queue pop-ups.
    pub fn drain_reminders(&mut self) {
        let mut fired = 0;
        while let Ok(due) = self.fired_rx.try_recv() {
            self.popups.push_back(due);
            fired += 1;
        }
        if fired == 0 {
            return;
        }
        let saved = self.store().save();
        if let Err(e) = saved {
            error!("could not persist reminder flags: {e}");
            self.status_message = Some(format!("Save failed: {e}"));
        }
        self.refresh();
    }

    pub fn dismiss_popup(&mut self) {
        self.popups.pop_front();
    }

    pub fn open_reminder_prompt(&mut self) {
        match self.selected_entry() {
            Some(entry) => {
                self.prompt = Some(ReminderPrompt::new(entry.id, &entry.name, entry.reminder_minutes()));
            }
            None => self.status_message = Some("Select an entry first.".to_string()),
        }
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn prompt_input_char(&mut self, c: char) {
        if let Some(ref mut prompt) = self.prompt {
            prompt.input_char(c);
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(ref mut prompt) = self.prompt {
            prompt.backspace();
        }
    }

    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        let minutes = match parse_reminder_minutes(&prompt.input, REMINDER_MIN, REMINDER_MAX) {
            Ok(m) => m,
            Err(e) => {
                prompt.error = Some(e.to_string());
                return;
            }
        };
        let (id, name) = (prompt.entry_id, prompt.name.clone());
        let result = self.store().set_reminder(id, minutes);
        match result {
            Ok(()) => {
                self.prompt = None;
                self.status_message = Some(format!("Reminder set: {} min before {}", minutes, name));
            }
            Err(e) => {
                error!(entry_id = %id, "set reminder failed: {e}");
                self.prompt = None;
                self.status_message = Some(format!("Could not set reminder: {e}"));
            }
        }
        self.refresh();
    }

    // ── Entry form ──

    pub fn open_form(&mut self, kind: EntryKind) {
        self.form_state = Some(EntryFormState::new(kind));
    }

    pub fn open_edit_form(&mut self) {
        match self.selected_entry() {
            Some(entry) => self.form_state = Some(EntryFormState::edit(entry)),
            None => self.status_message = Some("Select an entry to edit.".to_string()),
        }
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
    }

    pub fn form_tab(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.next_field();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.prev_field();
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.form_state {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.backspace();
        }
    }

    /// Validate, conflict-check and save the open form.
    /// On any rejection the form stays open with the message and nothing changes.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form_state.as_ref() else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.set_form_error(e.to_string());
                return;
            }
        };
        let editing = form.editing;

        let result = {
            let mut store = self.store();
            if draft.kind == EntryKind::Class {
                let day = draft.day.clone().unwrap_or_default();
                let time = draft.time.clone().unwrap_or_default();
                if let Some(conflict) = self.checker.check(&store.by_day(), &day, &time, editing) {
                    drop(store);
                    self.set_form_error(conflict.to_string());
                    return;
                }
            }
            let name = draft.name.clone();
            match editing {
                Some(id) => store.update(id, draft).map(|()| (id, format!("Updated {}", name))),
                None => store.add(draft).map(|id| (id, format!("Added {}", name))),
            }
        };

        match result {
            Ok((id, msg)) => {
                self.form_state = None;
                self.refresh();
                self.select_id(id);
                self.status_message = Some(msg);
            }
            Err(e) => {
                error!("saving entry failed: {e}");
                self.set_form_error(format!("Could not save: {e}"));
            }
        }
    }

    fn set_form_error(&mut self, msg: String) {
        if let Some(ref mut form) = self.form_state {
            form.error = Some(msg);
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_entry().map(|e| e.id) else {
            self.status_message = Some("Select an entry to delete.".to_string());
            return;
        };
        let result = self.store().delete(id);
        match result {
            Ok(removed) => {
                info!(entry_id = %id, "deleted from UI");
                self.status_message = Some(format!("Deleted {}", removed.name));
            }
            Err(e) => {
                error!(entry_id = %id, "delete failed: {e}");
                self.status_message = Some(format!("Delete failed: {e}"));
            }
        }
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use class_reminder::schedule::EntryDraft;

    fn app_with(entries: &[EntryDraft]) -> (App, mpsc::Sender<ReminderDue>, SharedStore) {
        let store = ScheduleStore::in_memory().into_shared();
        for draft in entries {
            store.lock().unwrap().add(draft.clone()).unwrap();
        }
        let (tx, rx) = mpsc::channel(8);
        let app = App::new(store.clone(), rx, ConflictChecker::default());
        (app, tx, store)
    }

    fn fill_class(app: &mut App, day: &str, time: &str, name: &str) {
        let form = app.form_state.as_mut().unwrap();
        form.day = day.into();
        form.time = time.into();
        form.name = name.into();
    }

    #[test]
    fn conflicting_class_is_rejected_without_mutation() {
        let (mut app, _tx, store) = app_with(&[EntryDraft::class("Monday", "09:00", "Math")]);
        app.open_form(EntryKind::Class);
        fill_class(&mut app, "Monday", "09:30", "Physics");
        app.submit_form();

        let form = app.form_state.as_ref().expect("form stays open");
        assert_eq!(
            form.error.as_deref(),
            Some("Conflict: Math is scheduled from 09:00 AM on Monday.")
        );
        assert_eq!(store.lock().unwrap().len(), 1);
    }

    #[test]
    fn valid_class_is_added_and_selected() {
        let (mut app, _tx, store) = app_with(&[EntryDraft::class("Monday", "09:00", "Math")]);
        app.open_form(EntryKind::Class);
        fill_class(&mut app, "Monday", "10:00", "Physics");
        app.submit_form();

        assert!(app.form_state.is_none());
        assert_eq!(store.lock().unwrap().len(), 2);
        assert_eq!(app.rows[app.selected].name, "Physics");
    }

    #[test]
    fn editing_does_not_conflict_with_itself() {
        let (mut app, _tx, store) = app_with(&[EntryDraft::class("Monday", "09:00", "Math")]);
        app.open_edit_form();
        app.form_state.as_mut().unwrap().time = "09:15".into();
        app.submit_form();

        assert!(app.form_state.is_none());
        let store = store.lock().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].time.as_deref(), Some("09:15"));
    }

    #[test]
    fn prompt_enforces_range_then_sets_reminder() {
        let (mut app, _tx, store) = app_with(&[EntryDraft::class("Monday", "09:00", "Math")]);
        app.open_reminder_prompt();
        app.prompt_input_char('5');
        app.prompt_input_char('0');
        app.prompt_input_char('0');
        app.submit_prompt();
        assert!(app.prompt.as_ref().unwrap().error.is_some());

        app.prompt_backspace();
        app.submit_prompt();
        assert!(app.prompt.is_none());
        assert_eq!(store.lock().unwrap().list()[0].reminder_minutes(), Some(50));
    }

    #[test]
    fn fired_reminders_become_popups() {
        let (mut app, tx, _store) = app_with(&[EntryDraft::class("Monday", "09:00", "Math")]);
        let entry = app.rows[0].clone();
        tx.try_send(ReminderDue {
            entry_id: entry.id,
            kind: entry.kind,
            name: entry.name.clone(),
            time: "09:00".into(),
            location: None,
            fired_at: Local::now().naive_local(),
        })
        .unwrap();

        app.drain_reminders();
        assert_eq!(app.popups.len(), 1);
        app.dismiss_popup();
        assert!(app.popups.is_empty());
    }

    #[test]
    fn drained_reminders_are_written_to_disk() {
        use chrono::NaiveDateTime;
        use class_reminder::reminder::ReminderPoller;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("class_schedule.json");
        let mut store = ScheduleStore::open(&path);
        let id = store
            .add(EntryDraft::class("Monday", "10:00", "Math").with_reminder(Some(15)))
            .unwrap();
        let store = store.into_shared();

        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let now: NaiveDateTime = day.and_hms_opt(9, 50, 0).unwrap();
        let (tx, rx) = mpsc::channel(8);
        let mut poller = ReminderPoller::with_clock(store.clone(), tx, move || now);
        let mut app = App::new(store, rx, ConflictChecker::default());

        assert_eq!(poller.tick(), 1);
        assert_eq!(ScheduleStore::open(&path).get(id).unwrap().last_notified_date, None);

        app.drain_reminders();
        assert_eq!(app.popups.len(), 1);
        assert!(app.status_message.is_none());
        assert_eq!(
            ScheduleStore::open(&path).get(id).unwrap().last_notified_date,
            Some(day)
        );
    }

    #[test]
    fn delete_removes_selected_row() {
        let (mut app, _tx, store) = app_with(&[
            EntryDraft::class("Monday", "09:00", "Math"),
            EntryDraft::class("Monday", "11:00", "Art"),
        ]);
        app.select_last();
        app.delete_selected();
        let store = store.lock().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].name, "Math");
    }
}
