use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use class_reminder::reminder::ReminderPoller;
use class_reminder::schedule::{EntryDraft, ScheduleStore};
use tokio::sync::mpsc;

fn fixed(h: u32, m: u32) -> impl Fn() -> NaiveDateTime + Send + Sync + 'static {
    move || {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }
}

fn store_with_class(offset: Option<u32>) -> class_reminder::SharedStore {
    let mut store = ScheduleStore::in_memory();
    store
        .add(
            EntryDraft::class("Monday", "10:00", "Math")
                .with_location("Room 101")
                .with_reminder(offset),
        )
        .unwrap();
    store.into_shared()
}

#[test]
fn tick_fires_once_per_day() {
    let store = store_with_class(Some(15));
    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = ReminderPoller::with_clock(store.clone(), tx, fixed(9, 45));

    assert_eq!(poller.tick(), 1);
    assert_eq!(poller.tick(), 0);

    let due = rx.try_recv().unwrap();
    assert_eq!(due.name, "Math");
    assert_eq!(due.message(), "Reminder: Class - Math at 10:00\nLocation: Room 101");
    assert!(rx.try_recv().is_err());

    let flag = store.lock().unwrap().list()[0].last_notified_date;
    assert_eq!(flag, NaiveDate::from_ymd_opt(2026, 10, 19));
}

#[test]
fn tick_before_threshold_sends_nothing() {
    let store = store_with_class(Some(15));
    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = ReminderPoller::with_clock(store, tx, fixed(9, 44));

    assert_eq!(poller.tick(), 0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn full_channel_leaves_entry_unflagged() {
    let mut store = ScheduleStore::in_memory();
    for name in ["Math", "Art"] {
        store
            .add(EntryDraft::class("Monday", "10:00", name).with_reminder(Some(30)))
            .unwrap();
    }
    let store = store.into_shared();
    let (tx, mut rx) = mpsc::channel(1);
    let mut poller = ReminderPoller::with_clock(store.clone(), tx, fixed(9, 45));

    assert_eq!(poller.tick(), 1);
    let flagged = store
        .lock()
        .unwrap()
        .list()
        .iter()
        .filter(|e| e.last_notified_date.is_some())
        .count();
    assert_eq!(flagged, 1);

    rx.try_recv().unwrap();
    assert_eq!(poller.tick(), 1);
    assert_eq!(rx.try_recv().unwrap().name, "Art");
}

#[test]
fn malformed_entries_do_not_stop_the_pass() {
    let mut store = ScheduleStore::in_memory();
    store
        .add(EntryDraft::class("Monday", "10:00", "Math").with_reminder(Some(15)))
        .unwrap();
    store.entries_mut()[0].time = Some("ten".to_string());
    store
        .add(EntryDraft::class("Monday", "10:00", "Art").with_reminder(Some(15)))
        .unwrap();
    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = ReminderPoller::with_clock(store.into_shared(), tx, fixed(9, 50));

    assert_eq!(poller.tick(), 1);
    assert_eq!(rx.try_recv().unwrap().name, "Art");
}

#[tokio::test]
async fn spawned_poller_delivers_and_shuts_down() {
    let store = store_with_class(Some(15));
    let (tx, mut rx) = mpsc::channel(4);
    let handle = ReminderPoller::with_clock(store, tx, fixed(9, 50))
        .interval(Duration::from_millis(10))
        .spawn();

    let due = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("reminder within timeout")
        .expect("channel open");
    assert_eq!(due.name, "Math");

    // Later ticks must not repeat the same reminder.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    assert!(handle.shutdown(Duration::from_secs(1)).await);
}
