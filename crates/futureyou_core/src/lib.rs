//! Core domain logic for Future You.
//! This crate is the single source of truth for notes, deliveries and the
//! statistics derived from them.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod stats;
pub mod store;

pub use clock::{Clock, IdSource, SystemClock, UuidIds};
pub use config::{ConfigError, FlushPolicy, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::delivery::{DeliveryAction, DeliveryDraft, DeliveryId, NoteDelivery};
pub use model::note::{Mood, Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
pub use model::trigger::{ClockTime, Trigger, TriggerConfig, TriggerSettings, TriggerType};
pub use model::Timestamp;
pub use repo::state_repo::{
    PersistedState, RepoError, RepoResult, SqliteStateRepository, StateRepository, STATE_KEY,
};
pub use stats::{Insights, Stats, SuccessTier, TopNote, Trend};
pub use store::{open_connection, Store, StoreError, StoreOptions, SubscriptionId};
