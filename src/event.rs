use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

fn poll_key(timeout: Duration) -> Result<Option<KeyEvent>> {
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
            _ => continue,
        }
    }
    Ok(None)
}

/// Wait up to `timeout` for a key press without stalling other tasks on the
/// runtime thread.
pub async fn next_key_event(timeout: Duration) -> Result<Option<KeyEvent>> {
    tokio::task::spawn_blocking(move || poll_key(timeout)).await?
}
