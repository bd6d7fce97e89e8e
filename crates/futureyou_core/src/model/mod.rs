//! Domain model for notes written to a future self.
//!
//! # Responsibility
//! - Define the persisted shapes (`Note`, `Trigger`, `NoteDelivery`).
//! - Define the caller-facing input shapes used by store mutations.
//!
//! # Invariants
//! - Identifiers are opaque strings, assigned once and never reused.
//! - Optional fields use `Option`; an empty string is never read as absent.
//! - Counters on `Note` are independent of the delivery log.

pub mod delivery;
pub mod note;
pub mod samples;
pub mod trigger;

/// Unix epoch milliseconds.
pub type Timestamp = i64;
