//! Time and identifier sources consumed by the store.
//!
//! Both are injected so tests can pin timestamps and ids.

use crate::model::Timestamp;
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Wall-clock source in Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Source of globally unique identifier strings.
pub trait IdSource {
    fn next_id(&self) -> String;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Clock that only moves when told to.
///
/// Every read advances by `step_ms` after returning, so consecutive reads are
/// strictly increasing when `step_ms > 0`.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Timestamp>,
    step_ms: Timestamp,
}

impl ManualClock {
    pub fn new(start: Timestamp, step_ms: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
            step_ms,
        }
    }

    /// Sets the next value returned by `now_ms`.
    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        let current = self.now.get();
        self.now.set(current + self.step_ms);
        current
    }
}

/// Deterministic ids of the form `<prefix>-<n>`, starting at 1.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}-{value}", self.prefix)
    }
}
