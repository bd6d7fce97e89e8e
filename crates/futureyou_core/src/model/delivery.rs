//! Delivery log records.
//!
//! A delivery is one presumed firing of a note's trigger together with the
//! user's response to it.
//!
//! # Invariants
//! - `note_id` is a back-reference only; the note may no longer exist.
//! - Deliveries are never removed when their note is deleted.

use crate::model::note::NoteId;
use crate::model::trigger::TriggerType;
use crate::model::Timestamp;
use serde::{Deserialize, Serialize};

/// Stable delivery identifier.
pub type DeliveryId = String;

/// User response to a delivered note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryAction {
    Followed,
    Ignored,
    Snoozed,
    /// Natural initial state; not enforced.
    #[default]
    Pending,
}

impl DeliveryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Followed => "followed",
            Self::Ignored => "ignored",
            Self::Snoozed => "snoozed",
            Self::Pending => "pending",
        }
    }

    /// Returns whether the user has responded.
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDelivery {
    pub id: DeliveryId,
    pub note_id: NoteId,
    pub triggered_at: Timestamp,
    pub trigger_type: TriggerType,
    pub action: DeliveryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl NoteDelivery {
    pub fn from_draft(id: DeliveryId, draft: DeliveryDraft) -> Self {
        Self {
            id,
            note_id: draft.note_id,
            triggered_at: draft.triggered_at,
            trigger_type: draft.trigger_type,
            action: draft.action,
            feedback: draft.feedback,
        }
    }
}

/// Caller-supplied fields for `Store::record_delivery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDraft {
    pub note_id: NoteId,
    pub triggered_at: Timestamp,
    pub trigger_type: TriggerType,
    pub action: DeliveryAction,
    pub feedback: Option<String>,
}

impl DeliveryDraft {
    /// Pending delivery for `note_id` fired at `triggered_at`.
    pub fn pending(
        note_id: impl Into<NoteId>,
        trigger_type: TriggerType,
        triggered_at: Timestamp,
    ) -> Self {
        Self {
            note_id: note_id.into(),
            triggered_at,
            trigger_type,
            action: DeliveryAction::Pending,
            feedback: None,
        }
    }
}
