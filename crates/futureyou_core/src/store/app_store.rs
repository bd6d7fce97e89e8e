use crate::clock::{Clock, IdSource, SystemClock, UuidIds};
use crate::config::{FlushPolicy, StoreConfig};
use crate::db::{open_db, DbError};
use crate::logging::init_logging;
use crate::model::delivery::{DeliveryAction, DeliveryDraft, NoteDelivery};
use crate::model::note::{Note, NoteDraft, NotePatch};
use crate::model::samples::demo_notes;
use crate::repo::state_repo::{PersistedState, RepoError, StateRepository, STATE_KEY};
use crate::stats::{self, Insights, Stats, TopNote};
use crate::store::subscription::{Listeners, SubscriptionId};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures surfaced by store bootstrap and explicit flushes.
///
/// Mutations themselves never return errors.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Repo(RepoError),
    Logging(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Behavior switches for `Store::open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub flush_policy: FlushPolicy,
    pub seed_demo_notes: bool,
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            flush_policy: config.flush_policy,
            seed_demo_notes: config.seed_demo_notes,
        }
    }
}

/// Starts logging (when configured) and opens the migrated database.
pub fn open_connection(config: &StoreConfig) -> Result<Connection, StoreError> {
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, &log_dir.to_string_lossy()).map_err(StoreError::Logging)?;
    }
    Ok(open_db(&config.db_path)?)
}

/// Persisted note/delivery store.
pub struct Store<R: StateRepository> {
    repo: R,
    state: PersistedState,
    dirty: bool,
    flush_policy: FlushPolicy,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    listeners: Listeners,
}

impl<R: StateRepository> Store<R> {
    /// Loads persisted state, or starts empty (or seeded) when none exists.
    ///
    /// # Errors
    /// - Repository failures, including undecodable or newer-layout blobs.
    pub fn open(repo: R, options: StoreOptions) -> Result<Self, StoreError> {
        let loaded = repo.load(STATE_KEY)?;
        let restored = loaded.is_some();
        let state = match loaded {
            Some(state) => state,
            None if options.seed_demo_notes => PersistedState {
                notes: demo_notes(),
                deliveries: Vec::new(),
            },
            None => PersistedState::default(),
        };

        info!(
            "event=state_load module=store status=ok restored={} notes={} deliveries={}",
            restored,
            state.notes.len(),
            state.deliveries.len()
        );

        Ok(Self {
            repo,
            state,
            dirty: false,
            flush_policy: options.flush_policy,
            clock: Box::new(SystemClock),
            ids: Box::new(UuidIds),
            listeners: Listeners::default(),
        })
    }

    /// Replaces the wall-clock source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the id source.
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Notes, most recently added first.
    pub fn notes(&self) -> &[Note] {
        &self.state.notes
    }

    /// Deliveries, most recently recorded first.
    pub fn deliveries(&self) -> &[NoteDelivery] {
        &self.state.deliveries
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.state.notes.iter().find(|note| note.id == id)
    }

    pub fn delivery(&self, id: &str) -> Option<&NoteDelivery> {
        self.state
            .deliveries
            .iter()
            .find(|delivery| delivery.id == id)
    }

    /// Deliveries pointing at `note_id`, whether or not the note still exists.
    pub fn deliveries_for<'a>(
        &'a self,
        note_id: &'a str,
    ) -> impl Iterator<Item = &'a NoteDelivery> + 'a {
        self.state
            .deliveries
            .iter()
            .filter(move |delivery| delivery.note_id == note_id)
    }

    pub fn insights(&self) -> Insights {
        stats::insights(&self.state.notes)
    }

    pub fn summary(&self) -> Stats {
        stats::summary(&self.state.notes)
    }

    pub fn top_notes(&self) -> Vec<TopNote> {
        stats::top_notes(&self.state.notes)
    }

    /// Returns whether in-memory state has unwritten changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn flush_policy(&self) -> FlushPolicy {
        self.flush_policy
    }

    /// Registers a listener called after every effective mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&PersistedState) + 'static) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Removes a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Creates a note from `draft` and puts it first.
    ///
    /// Title and message are trusted as given.
    pub fn add_note(&mut self, draft: NoteDraft) -> Note {
        let id = self.fresh_id(|candidate| self.note(candidate).is_some());
        let note = Note::from_draft(id, draft, self.clock.now_ms());
        info!(
            "event=note_add module=store status=ok note_id={} triggers={}",
            note.id,
            note.triggers.len()
        );
        self.state.notes.insert(0, note.clone());
        self.commit();
        note
    }

    /// Merges `patch` into the note with `id` and refreshes `updated_at`.
    ///
    /// Returns `false` (and changes nothing) when no note matches.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> bool {
        let Some(note) = self.state.notes.iter_mut().find(|note| note.id == id) else {
            debug!("event=note_update module=store status=noop reason=not_found");
            return false;
        };

        // `updated_at` must move forward even when the clock has not.
        let now = self.clock.now_ms().max(note.updated_at.saturating_add(1));
        note.apply_patch(patch, now);
        info!(
            "event=note_update module=store status=ok note_id={}",
            note.id
        );
        self.commit();
        true
    }

    /// Removes the note with `id`. Its deliveries are kept.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let Some(index) = self.state.notes.iter().position(|note| note.id == id) else {
            debug!("event=note_delete module=store status=noop reason=not_found");
            return false;
        };

        let removed = self.state.notes.remove(index);
        let orphaned = self.deliveries_for(&removed.id).count();
        info!(
            "event=note_delete module=store status=ok note_id={} orphaned_deliveries={}",
            removed.id, orphaned
        );
        self.commit();
        true
    }

    /// Appends a delivery to the front of the log.
    pub fn record_delivery(&mut self, draft: DeliveryDraft) -> NoteDelivery {
        let id = self.fresh_id(|candidate| self.delivery(candidate).is_some());
        let delivery = NoteDelivery::from_draft(id, draft);
        info!(
            "event=delivery_record module=store status=ok delivery_id={} note_id={} trigger_type={} action={}",
            delivery.id,
            delivery.note_id,
            delivery.trigger_type.as_str(),
            delivery.action.as_str()
        );
        self.state.deliveries.insert(0, delivery.clone());
        self.commit();
        delivery
    }

    /// Overwrites `action` and `feedback` on the delivery with `id`.
    ///
    /// `feedback = None` clears any earlier feedback.
    pub fn update_delivery_action(
        &mut self,
        id: &str,
        action: DeliveryAction,
        feedback: Option<String>,
    ) -> bool {
        let Some(delivery) = self
            .state
            .deliveries
            .iter_mut()
            .find(|delivery| delivery.id == id)
        else {
            debug!("event=delivery_update module=store status=noop reason=not_found");
            return false;
        };

        delivery.action = action;
        delivery.feedback = feedback;
        info!(
            "event=delivery_update module=store status=ok delivery_id={} action={}",
            delivery.id,
            action.as_str()
        );
        self.commit();
        true
    }

    /// Writes the full state when dirty.
    ///
    /// On failure the dirty flag stays set so a later flush retries.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let saved_at = self.clock.now_ms();
        self.repo.save(STATE_KEY, &self.state, saved_at)?;
        self.dirty = false;
        debug!(
            "event=state_flush module=store status=ok notes={} deliveries={}",
            self.state.notes.len(),
            self.state.deliveries.len()
        );
        Ok(())
    }

    fn commit(&mut self) {
        self.dirty = true;
        if self.flush_policy == FlushPolicy::Immediate {
            if let Err(err) = self.flush() {
                error!(
                    "event=state_flush module=store status=error error_code=flush_failed error={}",
                    err
                );
            }
        }
        self.listeners.notify(&self.state);
    }

    // Falls back to suffixed candidates when the source repeats an id.
    fn fresh_id(&self, taken: impl Fn(&str) -> bool) -> String {
        let candidate = self.ids.next_id();
        if !taken(&candidate) {
            return candidate;
        }

        warn!("event=id_collision module=store status=retry");
        let mut suffix = 1u64;
        loop {
            let id = format!("{candidate}-{suffix}");
            if !taken(&id) {
                return id;
            }
            suffix += 1;
        }
    }
}

impl<R: StateRepository> Drop for Store<R> {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            error!(
                "event=state_flush module=store status=error error_code=flush_on_drop_failed error={}",
                err
            );
        }
    }
}
