use carebill_core::models::Record;
use carebill_core::models::patient::Patient;
use carebill_core::models::settings::PracticeSettings;
use carebill_core::storage_keys;
use carebill_storage::error::StorageError;
use carebill_storage::memory::MemoryStore;
use carebill_storage::records;
use carebill_storage::state::{
    load_state, load_state_opt, save_state, save_state_if_absent, save_state_if_match,
};
use carebill_storage::store::ObjectStore;
use uuid::Uuid;

fn patient(first: &str) -> Patient {
    serde_json::from_value(serde_json::json!({
        "first_name": first,
        "last_name": "Doe",
        "date_of_birth": "1980-04-12",
    }))
    .unwrap()
}

#[tokio::test]
async fn get_missing_key_is_not_found() {
    let store = MemoryStore::new();
    let err = store.get("patients/nope.json").await.err().unwrap();
    assert!(matches!(err, StorageError::NotFound { key } if key == "patients/nope.json"));
}

#[tokio::test]
async fn list_is_prefix_scoped_and_sorted() {
    let store = MemoryStore::new();
    for key in ["payers/b.json", "patients/z.json", "patients/a.json", "patientsx.json"] {
        store.put(key, b"{}".to_vec(), None).await.unwrap();
    }
    let keys = store.list("patients/").await.unwrap();
    assert_eq!(keys, vec!["patients/a.json", "patients/z.json"]);
}

#[tokio::test]
async fn put_if_match_rejects_stale_etag() {
    let store = MemoryStore::new();
    let first = store.put("k", b"1".to_vec(), None).await.unwrap();
    let second = store
        .put_if_match("k", b"2".to_vec(), None, &first)
        .await
        .unwrap();
    assert_ne!(first, second);

    let err = store
        .put_if_match("k", b"3".to_vec(), None, &first)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
    assert_eq!(store.get("k").await.unwrap().body, b"2");
}

#[tokio::test]
async fn put_if_match_on_missing_key_fails() {
    let store = MemoryStore::new();
    let err = store
        .put_if_match("k", b"1".to_vec(), None, "\"0\"")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn put_if_absent_only_creates() {
    let store = MemoryStore::new();
    let etag = store.put_if_absent("k", b"1".to_vec(), None).await.unwrap();

    let err = store
        .put_if_absent("k", b"2".to_vec(), None)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
    let got = store.get("k").await.unwrap();
    assert_eq!(got.body, b"1");
    assert_eq!(got.etag.as_deref(), Some(etag.as_str()));

    store.delete("k").await.unwrap();
    store.put_if_absent("k", b"3".to_vec(), None).await.unwrap();
}

#[tokio::test]
async fn first_settings_write_loses_to_a_concurrent_creator() {
    let store = MemoryStore::new();
    let mine = PracticeSettings {
        practice_name: "Mine".to_string(),
        ..PracticeSettings::default()
    };
    let theirs = PracticeSettings {
        practice_name: "Theirs".to_string(),
        ..PracticeSettings::default()
    };

    save_state_if_absent(&store, storage_keys::PRACTICE_SETTINGS, &theirs)
        .await
        .unwrap();
    let err = save_state_if_absent(&store, storage_keys::PRACTICE_SETTINGS, &mine)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    let (kept, _): (PracticeSettings, String) =
        load_state(&store, storage_keys::PRACTICE_SETTINGS).await.unwrap();
    assert_eq!(kept.practice_name, "Theirs");
}

#[tokio::test]
async fn settings_round_trip_with_etag() {
    let store = MemoryStore::new();
    assert!(
        load_state_opt::<PracticeSettings>(&store, storage_keys::PRACTICE_SETTINGS)
            .await
            .unwrap()
            .is_none()
    );

    let etag = save_state(&store, storage_keys::PRACTICE_SETTINGS, &PracticeSettings::default())
        .await
        .unwrap();
    let (mut settings, loaded_etag): (PracticeSettings, String) =
        load_state(&store, storage_keys::PRACTICE_SETTINGS).await.unwrap();
    assert_eq!(etag, loaded_etag);

    settings.practice_name = "Elm Street Family Practice".to_string();
    save_state_if_match(&store, storage_keys::PRACTICE_SETTINGS, &settings, &loaded_etag)
        .await
        .unwrap();

    // a second writer holding the old etag loses
    let err = save_state_if_match(&store, storage_keys::PRACTICE_SETTINGS, &settings, &loaded_etag)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn record_crud() {
    let store = MemoryStore::new();

    let created = records::insert(&store, patient("Jane")).await.unwrap();
    assert!(store.get(&Patient::key(created.id)).await.is_ok());

    let mut edited = patient("Janet");
    edited.id = Uuid::new_v4();
    let updated = records::update(&store, created.id, edited).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let all: Vec<Patient> = records::list(&store).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name, "Janet");

    records::delete::<Patient>(&store, created.id).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn update_and_delete_unknown_id_are_not_found() {
    let store = MemoryStore::new();
    let id = Uuid::new_v4();
    assert!(matches!(
        records::update(&store, id, patient("Jane")).await,
        Err(StorageError::NotFound { .. })
    ));
    assert!(matches!(
        records::delete::<Patient>(&store, id).await,
        Err(StorageError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_skips_unparseable_objects() {
    let store = MemoryStore::new();
    records::insert(&store, patient("Jane")).await.unwrap();
    store
        .put("patients/garbage.json", b"not json".to_vec(), None)
        .await
        .unwrap();
    store
        .put("patients/readme.txt", b"ignored".to_vec(), None)
        .await
        .unwrap();

    let all: Vec<Patient> = records::list(&store).await.unwrap();
    assert_eq!(all.len(), 1);
}
