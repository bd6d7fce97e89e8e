use crate::model::note::{Note, NoteId};
use crate::stats::{rate_percent, TOP_NOTES_LIMIT};
use std::cmp::Ordering;

/// Aggregate view backing the insights screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insights {
    pub total_notes: usize,
    pub total_triggered: u64,
    pub total_followed: u64,
    pub total_ignored: u64,
    /// Rounded percentage, 0 when nothing was triggered.
    pub success_rate: u32,
    pub top_notes: Vec<TopNote>,
}

impl Insights {
    pub fn tier(&self) -> SuccessTier {
        SuccessTier::from_rate(self.success_rate)
    }

    pub fn trend(&self) -> Trend {
        Trend::from_rate(self.success_rate)
    }
}

/// One ranked entry in the most-helpful list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopNote {
    pub note_id: NoteId,
    pub title: String,
    pub times_triggered: u32,
    pub success_rate: u32,
}

/// Reporting shape for the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total_notes: usize,
    pub total_triggers: u64,
    pub times_helped: u64,
    /// Declared but never computed.
    pub streak_days: Option<u32>,
}

/// Encouragement band for an overall success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessTier {
    /// 70% and above.
    Thriving,
    /// 50% to 69%.
    Progressing,
    Building,
}

impl SuccessTier {
    pub fn from_rate(rate: u32) -> Self {
        if rate >= 70 {
            Self::Thriving
        } else if rate >= 50 {
            Self::Progressing
        } else {
            Self::Building
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Thriving => "Amazing! Past You is really helping. Keep it up!",
            Self::Progressing => "Good progress! You're listening to yourself more often.",
            Self::Building => "It's okay. Building better habits takes time.",
        }
    }
}

/// Direction hint shown next to a success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Neutral,
    Down,
}

impl Trend {
    pub fn from_rate(rate: u32) -> Self {
        if rate > 60 {
            Self::Up
        } else if rate > 40 {
            Self::Neutral
        } else {
            Self::Down
        }
    }
}

/// Computes every aggregate in one pass plus the top-notes ranking.
pub fn insights(notes: &[Note]) -> Insights {
    let (total_triggered, total_followed, total_ignored) =
        notes
            .iter()
            .fold((0u64, 0u64, 0u64), |(triggered, followed, ignored), note| {
                (
                    triggered + u64::from(note.times_triggered),
                    followed + u64::from(note.times_followed),
                    ignored + u64::from(note.times_ignored),
                )
            });

    Insights {
        total_notes: notes.len(),
        total_triggered,
        total_followed,
        total_ignored,
        success_rate: rate_percent(total_followed, total_triggered),
        top_notes: top_notes(notes),
    }
}

/// Home-screen summary.
pub fn summary(notes: &[Note]) -> Stats {
    let insights = insights(notes);
    Stats {
        total_notes: insights.total_notes,
        total_triggers: insights.total_triggered,
        times_helped: insights.total_followed,
        streak_days: None,
    }
}

/// Up to three triggered notes, best exact follow ratio first.
///
/// Ties keep their relative order from `notes`.
pub fn top_notes(notes: &[Note]) -> Vec<TopNote> {
    let mut ranked = notes
        .iter()
        .filter(|note| note.times_triggered > 0)
        .collect::<Vec<_>>();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| compare_ratio_desc(a, b));
    ranked
        .into_iter()
        .take(TOP_NOTES_LIMIT)
        .map(|note| TopNote {
            note_id: note.id.clone(),
            title: note.title.clone(),
            times_triggered: note.times_triggered,
            success_rate: note.success_rate(),
        })
        .collect()
}

// Compares followed/triggered ratios exactly via cross multiplication.
fn compare_ratio_desc(a: &Note, b: &Note) -> Ordering {
    let lhs = u64::from(b.times_followed) * u64::from(a.times_triggered);
    let rhs = u64::from(a.times_followed) * u64::from(b.times_triggered);
    lhs.cmp(&rhs)
}
