pub mod entry_form;
pub mod reminder_popup;
pub mod schedule_table;
pub mod status_bar;
pub mod upcoming_list;

pub use entry_form::{EntryForm, EntryFormState};
pub use reminder_popup::{render_reminder_popup, render_reminder_prompt, ReminderPrompt};
pub use schedule_table::ScheduleTable;
pub use status_bar::StatusBar;
pub use upcoming_list::UpcomingList;
