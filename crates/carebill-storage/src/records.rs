//! Typed CRUD over [`Record`]s plus plain JSON helpers for nested keys
//! (eligibility checks, portal messages) that have no fixed prefix.
//!
//! Validation is the caller's job; these functions only persist.

use carebill_core::models::Record;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{JSON, ObjectStore};

pub async fn read_json<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<T, StorageError> {
    let output = store.get(key).await?;
    Ok(serde_json::from_slice(&output.body)?)
}

pub async fn write_json<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put(key, body, Some(JSON)).await?;
    Ok(())
}

/// Every `.json` object under `prefix`.
///
/// Objects that vanish between LIST and GET are skipped; anything that fails to
/// parse is logged and skipped so one bad object can't hide the rest.
pub async fn list_json<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let keys = store.list(prefix).await?;
    let mut items = Vec::with_capacity(keys.len());

    for key in keys.iter().filter(|k| k.ends_with(".json")) {
        match read_json(store, key).await {
            Ok(item) => items.push(item),
            Err(StorageError::NotFound { .. }) => {}
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(key = %key, error = %e, "skipping unreadable object");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(items)
}

pub async fn list<T: Record>(store: &dyn ObjectStore) -> Result<Vec<T>, StorageError> {
    list_json(store, T::PREFIX).await
}

pub async fn get<T: Record>(store: &dyn ObjectStore, id: Uuid) -> Result<T, StorageError> {
    read_json(store, &T::key(id)).await
}

/// Assign a fresh id and timestamps, then persist.
pub async fn insert<T: Record>(store: &dyn ObjectStore, mut record: T) -> Result<T, StorageError> {
    let id = Uuid::new_v4();
    record.stamp_new(id, jiff::Timestamp::now());
    write_json(store, &T::key(id), &record).await?;
    tracing::info!(kind = T::KIND, %id, "record created");
    Ok(record)
}

/// Replace an existing record, keeping its id and `created_at`.
/// Fails with [`StorageError::NotFound`] if nothing is stored under `id`.
pub async fn update<T: Record>(
    store: &dyn ObjectStore,
    id: Uuid,
    mut record: T,
) -> Result<T, StorageError> {
    let existing: T = get(store, id).await?;
    record.stamp_existing(id, existing.created_at(), jiff::Timestamp::now());
    write_json(store, &T::key(id), &record).await?;
    tracing::info!(kind = T::KIND, %id, "record updated");
    Ok(record)
}

/// Persist a record that was already loaded and mutated in place.
pub async fn save<T: Record>(store: &dyn ObjectStore, record: &T) -> Result<(), StorageError> {
    write_json(store, &T::key(record.id()), record).await
}

pub async fn delete<T: Record>(store: &dyn ObjectStore, id: Uuid) -> Result<(), StorageError> {
    let key = T::key(id);
    // S3 deletes are idempotent; surface 404 for unknown ids
    store.get(&key).await?;
    store.delete(&key).await?;
    tracing::info!(kind = T::KIND, %id, "record deleted");
    Ok(())
}
