//! Read-only statistics derived from the note list.
//!
//! # Responsibility
//! - Aggregate trigger/follow/ignore counters across notes.
//! - Rank the most helpful notes.
//!
//! # Invariants
//! - Every function is pure and recomputes from its input; nothing is cached.
//! - Notes with `times_triggered == 0` never enter a rate denominator or a
//!   ranking.

mod insights;

pub use insights::{insights, summary, top_notes, Insights, Stats, SuccessTier, TopNote, Trend};

/// Number of notes reported by `top_notes`.
pub const TOP_NOTES_LIMIT: usize = 3;

/// `round(100 * numerator / denominator)` with half-up rounding.
///
/// Returns 0 when `denominator` is 0.
pub fn rate_percent(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let rounded = (200 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
