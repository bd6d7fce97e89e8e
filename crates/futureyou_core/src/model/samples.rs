//! Demo notes used to seed an empty store.

use crate::model::note::{Mood, Note};
use crate::model::trigger::{Trigger, TriggerType};
use serde_json::json;

// 2024-01-08, 2024-01-10, 2024-01-12, 2024-01-15 at 00:00 UTC.
const JAN_08: i64 = 1_704_672_000_000;
const JAN_10: i64 = 1_704_844_800_000;
const JAN_12: i64 = 1_705_017_600_000;
const JAN_15: i64 = 1_705_276_800_000;

/// Returns the three demo notes, most recent first.
pub fn demo_notes() -> Vec<Note> {
    vec![
        Note {
            id: "1".to_string(),
            title: "Remember why you stopped scrolling".to_string(),
            message: "Hey, you wrote this because you always feel empty after an hour on \
                      social media. Go read that book instead, or call Mom. You'll thank \
                      yourself."
                .to_string(),
            mood: Some(Mood::Anxious),
            reason: Some("I wasted 3 hours last night and felt terrible".to_string()),
            triggers: vec![
                Trigger::from_type("t1", TriggerType::AppUsage)
                    .labeled("After 30min on social apps")
                    .with_config("apps", json!(["instagram", "twitter"]))
                    .with_config("minutes", 30),
                Trigger::from_type("t2", TriggerType::TimeOfDay)
                    .labeled("Late night (after 11pm)")
                    .with_config("after", "23:00"),
            ],
            created_at: JAN_15,
            updated_at: JAN_15,
            times_triggered: 12,
            times_followed: 8,
            times_ignored: 4,
        },
        Note {
            id: "2".to_string(),
            title: "You don't need to buy that".to_string(),
            message: "Pause. Is this purchase going to matter in a month? You have enough. \
                      Sleep on it and decide tomorrow with fresh eyes."
                .to_string(),
            mood: Some(Mood::Motivated),
            reason: Some("Impulse buying has cost me a lot".to_string()),
            triggers: vec![Trigger::from_type("t3", TriggerType::AppUsage)
                .labeled("When opening shopping apps")
                .with_config("apps", json!(["amazon", "shopping"]))],
            created_at: JAN_10,
            updated_at: JAN_12,
            times_triggered: 5,
            times_followed: 4,
            times_ignored: 1,
        },
        Note {
            id: "3".to_string(),
            title: "Take a breath before responding".to_string(),
            message: "You're probably feeling defensive right now. That's okay. But you know \
                      that angry texts never help. Write it out, then delete it. Respond \
                      tomorrow."
                .to_string(),
            mood: Some(Mood::Frustrated),
            reason: None,
            triggers: vec![Trigger::from_type("t4", TriggerType::MoodCheckin)
                .labeled("When feeling frustrated")
                .with_config("moods", json!(["frustrated", "anxious"]))],
            created_at: JAN_08,
            updated_at: JAN_08,
            times_triggered: 3,
            times_followed: 3,
            times_ignored: 0,
        },
    ]
}
