//! Note domain model.
//!
//! # Responsibility
//! - Define the central `Note` record and its optional `Mood`.
//! - Provide draft/patch input shapes for store mutations.
//! - Provide caller-side draft normalization and validation.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - `NotePatch` cannot express changes to `id` or `created_at`.
//! - The store never calls `NoteDraft::validate`; callers do.

use crate::model::trigger::Trigger;
use crate::model::Timestamp;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable note identifier.
pub type NoteId = String;

/// How the author felt while writing the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Calm,
    Anxious,
    Motivated,
    Sad,
    Happy,
    Frustrated,
}

impl Mood {
    /// All moods in picker order.
    pub const ALL: [Mood; 6] = [
        Mood::Calm,
        Mood::Anxious,
        Mood::Motivated,
        Mood::Sad,
        Mood::Happy,
        Mood::Frustrated,
    ];

    /// Stable wire name (`calm`, `anxious`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Anxious => "anxious",
            Self::Motivated => "motivated",
            Self::Sad => "sad",
            Self::Happy => "happy",
            Self::Frustrated => "frustrated",
        }
    }

    /// Parses a wire name. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == value.trim())
    }
}

/// A message written by the user to be delivered later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Insertion order is preserved.
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub times_triggered: u32,
    #[serde(default)]
    pub times_followed: u32,
    #[serde(default)]
    pub times_ignored: u32,
}

impl Note {
    /// Builds a fresh note from a draft.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now`.
    /// - All counters start at zero.
    pub fn from_draft(id: NoteId, draft: NoteDraft, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            message: draft.message,
            mood: draft.mood,
            reason: draft.reason,
            triggers: draft.triggers,
            created_at: now,
            updated_at: now,
            times_triggered: 0,
            times_followed: 0,
            times_ignored: 0,
        }
    }

    /// Shallow-merges `patch` into this note and stamps `updated_at`.
    pub fn apply_patch(&mut self, patch: NotePatch, now: Timestamp) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(mood) = patch.mood {
            self.mood = mood;
        }
        if let Some(reason) = patch.reason {
            self.reason = reason;
        }
        if let Some(triggers) = patch.triggers {
            self.triggers = triggers;
        }
        if let Some(value) = patch.times_triggered {
            self.times_triggered = value;
        }
        if let Some(value) = patch.times_followed {
            self.times_followed = value;
        }
        if let Some(value) = patch.times_ignored {
            self.times_ignored = value;
        }
        self.updated_at = now;
    }

    /// Rounded followed/triggered percentage, or 0 when never triggered.
    pub fn success_rate(&self) -> u32 {
        crate::stats::rate_percent(
            u64::from(self.times_followed),
            u64::from(self.times_triggered),
        )
    }

    /// Looks up one trigger by id.
    pub fn trigger(&self, trigger_id: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|trigger| trigger.id == trigger_id)
    }
}

/// Caller-supplied fields for a new note.
///
/// Id, timestamps and counters are derived by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub message: String,
    pub mood: Option<Mood>,
    pub reason: Option<String>,
    pub triggers: Vec<Trigger>,
}

impl NoteDraft {
    /// Creates a draft with only the required fields set.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Builds a draft from raw form input.
    ///
    /// Title and message are trimmed; a blank reason becomes `None`.
    pub fn from_form(
        title: &str,
        message: &str,
        mood: Option<Mood>,
        reason: &str,
        triggers: Vec<Trigger>,
    ) -> Self {
        let reason = reason.trim();
        Self {
            title: title.trim().to_string(),
            message: message.trim().to_string(),
            mood,
            reason: (!reason.is_empty()).then(|| reason.to_string()),
            triggers,
        }
    }

    /// Checks the fields the save action requires.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyMessage` when the field is blank after trim.
    /// - `DuplicateTriggerId` when two triggers share an id.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.message.trim().is_empty() {
            return Err(NoteValidationError::EmptyMessage);
        }
        for (index, trigger) in self.triggers.iter().enumerate() {
            if self.triggers[..index]
                .iter()
                .any(|earlier| earlier.id == trigger.id)
            {
                return Err(NoteValidationError::DuplicateTriggerId(trigger.id.clone()));
            }
        }
        Ok(())
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }
}

/// Partial field overrides for `Store::update_note`.
///
/// `None` leaves a field untouched. For optional note fields the inner
/// `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub message: Option<String>,
    pub mood: Option<Option<Mood>>,
    pub reason: Option<Option<String>>,
    pub triggers: Option<Vec<Trigger>>,
    pub times_triggered: Option<u32>,
    pub times_followed: Option<u32>,
    pub times_ignored: Option<u32>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn counters(triggered: u32, followed: u32, ignored: u32) -> Self {
        Self {
            times_triggered: Some(triggered),
            times_followed: Some(followed),
            times_ignored: Some(ignored),
            ..Self::default()
        }
    }

    /// Returns whether the patch carries no overrides.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Caller-side validation failures for note drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyMessage,
    DuplicateTriggerId(String),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyMessage => write!(f, "message must not be empty"),
            Self::DuplicateTriggerId(id) => write!(f, "duplicate trigger id `{id}`"),
        }
    }
}

impl Error for NoteValidationError {}
