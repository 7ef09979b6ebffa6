use std::time::Duration;

use anyhow::Result;

use crate::domain::email::ObjectKey;
use crate::ingest::{Page, PageRequest};

/// How long a transient status line stays up.
pub const STATUS_DELAY: Duration = Duration::from_secs(2);

/// Session generation a request was issued under. Completions carrying an
/// older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub u64);

/// Screen-independent user intents; the key map decides which keys mean
/// what on each screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Open,
    Delete,
    Refresh,
    Back,
    Confirm,
    Cancel,
    Quit,
}

#[derive(Debug)]
pub enum Event {
    Key(Input),
    Resize {
        width: u16,
        height: u16,
    },
    BucketsLoaded {
        ticket: Ticket,
        result: Result<Vec<String>>,
    },
    PageLoaded {
        ticket: Ticket,
        result: Result<Page>,
    },
    Deleted {
        ticket: Ticket,
        key: ObjectKey,
        result: Result<()>,
    },
    StatusExpired {
        serial: u64,
    },
}

/// Work the session asks the outside world to do. Each request produces
/// exactly one completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListBuckets {
        ticket: Ticket,
    },
    FetchPage {
        ticket: Ticket,
        request: PageRequest,
    },
    Delete {
        ticket: Ticket,
        bucket: String,
        key: ObjectKey,
    },
    ClearStatusAfter {
        delay: Duration,
        serial: u64,
    },
    Quit,
}
