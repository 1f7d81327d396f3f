pub mod entry;
pub mod error;
pub mod sort;
pub mod store;

pub use entry::{canonical_day, weekday_index, EntryDraft, EntryKind, ScheduleEntry, WEEKDAYS};
pub use error::{StoreError, StoreResult};
pub use sort::SortKey;
pub use store::{group_by_day, ScheduleStore, SharedStore};
