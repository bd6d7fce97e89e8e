//! Persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the whole-state load/save contract used by the store.
//! - Keep SQL and blob encoding details out of the store.
//!
//! # Invariants
//! - State is always written and read as one blob per namespace key.
//! - Read paths reject undecodable or newer-than-supported blobs instead of
//!   masking them.

pub mod state_repo;
