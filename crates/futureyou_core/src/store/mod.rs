//! Single source of truth for notes and deliveries.
//!
//! # Responsibility
//! - Own both collections and seal every mutation behind `Store` methods.
//! - Derive ids and timestamps for new and updated records.
//! - Persist the whole state and notify subscribers after each change.
//!
//! # Invariants
//! - Mutations never fail; unknown ids are silent no-ops.
//! - A no-op neither persists nor notifies.
//! - Reads always reflect the latest mutation, flushed or not.

mod app_store;
mod subscription;

pub use app_store::{open_connection, Store, StoreError, StoreOptions};
pub use subscription::{Listener, SubscriptionId};
