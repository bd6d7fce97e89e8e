use futureyou_core::db::{open_db, open_db_in_memory};
use futureyou_core::{
    open_connection, DeliveryAction, DeliveryDraft, Mood, NoteDraft, NotePatch, PersistedState,
    RepoError, SqliteStateRepository, StateRepository, Store, StoreConfig, StoreError,
    StoreOptions, Trigger, TriggerType, STATE_KEY,
};
use rusqlite::params;
use serde_json::json;

#[test]
fn reload_reproduces_identical_collections() {
    let conn = open_db_in_memory().unwrap();

    let saved = {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = Store::open(repo, StoreOptions::default()).unwrap();
        let note = store.add_note(
            NoteDraft::new("Scroll less", "Go read instead.")
                .with_mood(Mood::Anxious)
                .with_reason("")
                .with_trigger(
                    Trigger::from_type("t1", TriggerType::AppUsage)
                        .with_config("apps", json!(["instagram"]))
                        .with_config("minutes", 30),
                ),
        );
        store.add_note(NoteDraft::new("Second", "Plain"));
        store.update_note(&note.id, NotePatch::counters(12, 8, 4));
        let delivery =
            store.record_delivery(DeliveryDraft::pending(note.id.clone(), TriggerType::AppUsage, 99));
        store.update_delivery_action(&delivery.id, DeliveryAction::Followed, Some("ok".into()));
        let snapshot = store.state().clone();
        snapshot
    };

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let reloaded = Store::open(repo, StoreOptions::default()).unwrap();

    assert_eq!(reloaded.state(), &saved);
    assert_eq!(reloaded.notes()[1].reason.as_deref(), Some(""));
}

#[test]
fn reload_from_file_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future_you.db");

    let note_id = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = Store::open(repo, StoreOptions::default()).unwrap();
        store.add_note(NoteDraft::new("persisted", "body")).id
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let store = Store::open(repo, StoreOptions::default()).unwrap();
    assert_eq!(store.notes().len(), 1);
    assert_eq!(store.notes()[0].id, note_id);
}

#[test]
fn persisted_blob_uses_camel_case_envelope() {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = Store::open(repo, StoreOptions::default()).unwrap();
        let note = store.add_note(NoteDraft::new("t", "m"));
        store.record_delivery(DeliveryDraft::pending(note.id, TriggerType::MoodCheckin, 7));
    }

    let blob: String = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1;",
            [STATE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

    assert_eq!(value["version"], 0);
    let note = &value["state"]["notes"][0];
    assert!(note.get("createdAt").is_some());
    assert!(note.get("timesTriggered").is_some());
    assert!(note.get("mood").is_none());
    let delivery = &value["state"]["deliveries"][0];
    assert_eq!(delivery["triggerType"], "mood_checkin");
    assert_eq!(delivery["action"], "pending");
}

#[test]
fn unknown_trigger_config_keys_survive_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let trigger = Trigger::from_type("t9", TriggerType::Location)
        .with_config("place", "gym")
        .with_config("radius", json!({"meters": 150, "strict": false}));
    let state = PersistedState {
        notes: vec![futureyou_core::Note::from_draft(
            "n".to_string(),
            NoteDraft::new("t", "m").with_trigger(trigger.clone()),
            1,
        )],
        deliveries: Vec::new(),
    };

    repo.save(STATE_KEY, &state, 2).unwrap();
    let loaded = repo.load(STATE_KEY).unwrap().unwrap();

    assert_eq!(loaded.notes[0].triggers[0], trigger);
}

#[test]
fn corrupt_blob_is_rejected_on_open() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3);",
        params![STATE_KEY, "{not json", 0],
    )
    .unwrap();

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let result = Store::open(repo, StoreOptions::default());
    assert!(matches!(result, Err(StoreError::Repo(RepoError::Codec(_)))));
}

#[test]
fn demo_seed_applies_only_without_persisted_state() {
    let conn = open_db_in_memory().unwrap();
    let seeded = StoreOptions {
        seed_demo_notes: true,
        ..StoreOptions::default()
    };

    {
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        let mut store = Store::open(repo, seeded).unwrap();
        let ids = store.notes().iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "3"]);
        store.delete_note("2");
    }

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let store = Store::open(repo, seeded).unwrap();
    let ids = store.notes().iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn open_connection_uses_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        db_path: dir.path().join("configured.db"),
        ..StoreConfig::default()
    };

    let conn = open_connection(&config).unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let store = Store::open(repo, StoreOptions::from(&config)).unwrap();

    assert!(store.notes().is_empty());
    assert!(config.db_path.exists());
}
