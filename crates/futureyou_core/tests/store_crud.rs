use futureyou_core::clock::{ManualClock, SequentialIds};
use futureyou_core::db::open_db_in_memory;
use futureyou_core::model::samples::demo_notes;
use futureyou_core::{
    DeliveryAction, DeliveryDraft, FlushPolicy, Mood, NoteDraft, NotePatch, PersistedState,
    SqliteStateRepository, StateRepository, Store, StoreOptions, Trigger, TriggerType, STATE_KEY,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn open_store(conn: &Connection) -> Store<SqliteStateRepository<'_>> {
    let repo = SqliteStateRepository::try_new(conn).unwrap();
    Store::open(repo, StoreOptions::default())
        .unwrap()
        .with_clock(ManualClock::new(1_700_000_000_000, 1))
        .with_ids(SequentialIds::new("n"))
}

fn draft(title: &str) -> NoteDraft {
    NoteDraft::new(title, format!("message for {title}"))
}

#[test]
fn add_note_assigns_fresh_id_zero_counters_and_equal_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut ids = HashSet::new();
    for idx in 0..5 {
        let note = store.add_note(draft(&format!("note {idx}")));
        assert!(ids.insert(note.id.clone()), "duplicate id {}", note.id);
        assert_eq!(note.times_triggered, 0);
        assert_eq!(note.times_followed, 0);
        assert_eq!(note.times_ignored, 0);
        assert_eq!(note.created_at, note.updated_at);
    }
}

#[test]
fn add_note_prepends_and_keeps_optional_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let first = store.add_note(draft("first"));
    let second = store.add_note(
        draft("second")
            .with_mood(Mood::Calm)
            .with_reason("because")
            .with_trigger(Trigger::from_type("t1", TriggerType::AppUsage))
            .with_trigger(Trigger::from_type("t2", TriggerType::Location)),
    );

    let ids = store.notes().iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let stored = store.note(&second.id).unwrap();
    assert_eq!(stored.mood, Some(Mood::Calm));
    assert_eq!(stored.reason.as_deref(), Some("because"));
    let trigger_ids = stored
        .triggers
        .iter()
        .map(|t| t.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(trigger_ids, vec!["t1", "t2"]);
}

#[test]
fn add_note_does_not_validate_caller_input() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let note = store.add_note(NoteDraft::new("", ""));
    assert_eq!(store.note(&note.id).unwrap().title, "");
}

#[test]
fn update_note_changes_only_patched_field_and_advances_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let original = store.add_note(draft("before").with_mood(Mood::Sad).with_reason("r"));
    store.add_note(draft("other"));

    assert!(store.update_note(&original.id, NotePatch::title("X")));

    let updated = store.note(&original.id).unwrap().clone();
    assert_eq!(updated.title, "X");
    assert!(updated.updated_at > original.updated_at);

    let mut expected = original.clone();
    expected.title = "X".to_string();
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
}

#[test]
fn update_note_advances_updated_at_even_with_frozen_clock() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = Store::open(repo, StoreOptions::default())
        .unwrap()
        .with_clock(ManualClock::new(5_000, 0));
    let note = store.add_note(draft("frozen"));

    store.update_note(&note.id, NotePatch::title("a"));
    let first = store.note(&note.id).unwrap().updated_at;
    store.update_note(&note.id, NotePatch::title("b"));
    let second = store.note(&note.id).unwrap().updated_at;

    assert!(first > note.updated_at);
    assert!(second > first);
    assert_eq!(store.note(&note.id).unwrap().created_at, 5_000);
}

#[test]
fn update_note_with_max_persisted_updated_at_does_not_overflow() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut notes = demo_notes();
    notes[0].updated_at = i64::MAX;
    let state = PersistedState {
        notes,
        deliveries: Vec::new(),
    };
    repo.save(STATE_KEY, &state, 0).unwrap();

    let mut store = Store::open(repo, StoreOptions::default())
        .unwrap()
        .with_clock(ManualClock::new(1_700_000_000_000, 1));

    assert!(store.update_note("1", NotePatch::title("X")));
    let note = store.note("1").unwrap();
    assert_eq!(note.title, "X");
    assert_eq!(note.updated_at, i64::MAX);
}

#[test]
fn update_note_replaces_counters_only_when_patched() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let note = store.add_note(draft("counted"));

    store.update_note(&note.id, NotePatch::counters(4, 3, 1));
    store.update_note(&note.id, NotePatch::title("renamed"));

    let stored = store.note(&note.id).unwrap();
    assert_eq!(
        (stored.times_triggered, stored.times_followed, stored.times_ignored),
        (4, 3, 1)
    );
}

#[test]
fn update_note_on_missing_id_is_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.add_note(draft("a"));
    store.add_note(draft("b"));
    let before = serde_json::to_string(store.state()).unwrap();

    assert!(!store.update_note("missing", NotePatch::title("X")));

    assert_eq!(serde_json::to_string(store.state()).unwrap(), before);
    assert!(!store.is_dirty());
}

#[test]
fn delete_note_removes_one_and_preserves_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let a = store.add_note(draft("a"));
    let b = store.add_note(draft("b"));
    let c = store.add_note(draft("c"));

    assert!(store.delete_note(&b.id));

    let ids = store.notes().iter().map(|n| n.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids, vec![c.id, a.id]);
}

#[test]
fn delete_note_twice_matches_deleting_once() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let a = store.add_note(draft("a"));
    store.add_note(draft("b"));

    assert!(store.delete_note(&a.id));
    let after_once = store.state().clone();
    assert!(!store.delete_note(&a.id));

    assert_eq!(store.state(), &after_once);
}

#[test]
fn delete_note_leaves_deliveries_dangling() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let note = store.add_note(draft("a"));
    let delivery = store.record_delivery(DeliveryDraft::pending(
        note.id.clone(),
        TriggerType::Manual,
        42,
    ));

    store.delete_note(&note.id);

    assert!(store.note(&note.id).is_none());
    let orphans = store.deliveries_for(&note.id).collect::<Vec<_>>();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, delivery.id);
}

#[test]
fn record_delivery_prepends_with_fresh_id() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let first = store.record_delivery(DeliveryDraft::pending("n-1", TriggerType::TimeOfDay, 10));
    let second = store.record_delivery(DeliveryDraft {
        note_id: "does-not-exist".to_string(),
        triggered_at: 20,
        trigger_type: TriggerType::ScreenTime,
        action: DeliveryAction::Followed,
        feedback: Some("helped".to_string()),
    });

    assert_ne!(first.id, second.id);
    let ids = store
        .deliveries()
        .iter()
        .map(|d| d.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    assert_eq!(store.delivery(&first.id).unwrap().action, DeliveryAction::Pending);
}

#[test]
fn update_delivery_action_overwrites_action_and_feedback() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let delivery = store.record_delivery(DeliveryDraft::pending("n-1", TriggerType::Manual, 10));

    assert!(store.update_delivery_action(
        &delivery.id,
        DeliveryAction::Snoozed,
        Some("later".to_string())
    ));
    let snoozed = store.delivery(&delivery.id).unwrap();
    assert_eq!(snoozed.action, DeliveryAction::Snoozed);
    assert_eq!(snoozed.feedback.as_deref(), Some("later"));

    assert!(store.update_delivery_action(&delivery.id, DeliveryAction::Followed, None));
    let followed = store.delivery(&delivery.id).unwrap();
    assert_eq!(followed.action, DeliveryAction::Followed);
    assert_eq!(followed.feedback, None);
    assert_eq!(followed.triggered_at, 10);
}

#[test]
fn update_delivery_action_on_missing_id_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.record_delivery(DeliveryDraft::pending("n-1", TriggerType::Manual, 10));
    let before = store.state().clone();

    assert!(!store.update_delivery_action("missing", DeliveryAction::Ignored, None));
    assert_eq!(store.state(), &before);
}

#[test]
fn manual_flush_policy_keeps_reads_consistent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let mut store = Store::open(
        repo,
        StoreOptions {
            flush_policy: FlushPolicy::Manual,
            seed_demo_notes: false,
        },
    )
    .unwrap();

    let note = store.add_note(draft("unflushed"));
    assert_eq!(store.notes()[0].id, note.id);
    assert!(store.is_dirty());

    let stored_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM app_state;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored_rows, 0);

    store.flush().unwrap();
    let stored_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM app_state;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored_rows, 1);
}
