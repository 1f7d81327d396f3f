use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::entry::{canonical_day, EntryDraft, ScheduleEntry};
use super::error::{StoreError, StoreResult};
use super::sort::{sort_entries, SortKey};

/// Store shared between the UI and the reminder poller.
pub type SharedStore = Arc<Mutex<ScheduleStore>>;

/// In-memory schedule mirrored to a single JSON file.
///
/// Every mutating call rewrites the whole file. There is no journal and no
/// partial write: the file always reflects the collection at the time of the
/// last successful save.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    path: Option<PathBuf>,
    entries: Vec<ScheduleEntry>,
}

impl ScheduleStore {
    /// Load `path`, falling back to an empty schedule if it is missing or unusable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(Some(entries)) => {
                info!(path = %path.display(), count = entries.len(), "schedule loaded");
                entries
            }
            Ok(None) => {
                info!(path = %path.display(), "no schedule file yet, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), "could not load schedule ({e}), starting empty");
                Vec::new()
            }
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn list(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [ScheduleEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn add(&mut self, draft: EntryDraft) -> StoreResult<Uuid> {
        let entry = ScheduleEntry::from_draft(draft);
        let id = entry.id;
        info!(entry_id = %id, name = %entry.name, kind = %entry.kind, "entry added");
        self.entries.push(entry);
        self.save()?;
        Ok(id)
    }

    pub fn update(&mut self, id: Uuid, draft: EntryDraft) -> StoreResult<()> {
        self.find_mut(id)?.apply(draft);
        info!(entry_id = %id, "entry updated");
        self.save()
    }

    pub fn delete(&mut self, id: Uuid) -> StoreResult<ScheduleEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound { id })?;
        let removed = self.entries.remove(idx);
        info!(entry_id = %id, name = %removed.name, "entry deleted");
        self.save()?;
        Ok(removed)
    }

    /// Set or clear (`0`) the reminder offset of one entry.
    pub fn set_reminder(&mut self, id: Uuid, minutes: u32) -> StoreResult<()> {
        let entry = self.find_mut(id)?;
        entry.reminder_offset_minutes = Some(minutes).filter(|m| *m > 0);
        info!(entry_id = %id, minutes, "reminder set");
        self.save()
    }

    /// Write the full collection. A no-op for in-memory stores.
    pub fn save(&self) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), count = self.entries.len(), "schedule saved");
        Ok(())
    }

    /// Entries grouped by weekday name, for conflict checks.
    /// Date-bound entries without a day are left out.
    pub fn by_day(&self) -> HashMap<String, Vec<&ScheduleEntry>> {
        group_by_day(&self.entries)
    }

    pub fn sorted(&self, key: SortKey) -> Vec<&ScheduleEntry> {
        let mut view: Vec<&ScheduleEntry> = self.entries.iter().collect();
        sort_entries(&mut view, key);
        view
    }

    /// Assignments and exams due today or later, soonest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&ScheduleEntry> {
        let mut due: Vec<(NaiveDate, &ScheduleEntry)> = self
            .entries
            .iter()
            .filter_map(|e| e.parsed_due_date().map(|d| (d, e)))
            .filter(|(d, _)| *d >= today)
            .collect();
        due.sort_by_key(|(d, _)| *d);
        due.into_iter().map(|(_, e)| e).collect()
    }

    fn find_mut(&mut self, id: Uuid) -> StoreResult<&mut ScheduleEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound { id })
    }
}

pub fn group_by_day(entries: &[ScheduleEntry]) -> HashMap<String, Vec<&ScheduleEntry>> {
    let mut days: HashMap<String, Vec<&ScheduleEntry>> = HashMap::new();
    for entry in entries {
        if let Some(day) = entry.day.as_deref().filter(|d| !d.trim().is_empty()) {
            days.entry(canonical_day(day)).or_default().push(entry);
        }
    }
    days
}

fn load_entries(path: &Path) -> StoreResult<Option<Vec<ScheduleEntry>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }
    Ok(Some(serde_json::from_str(&content)?))
}
