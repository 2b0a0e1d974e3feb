use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StorageError;
use crate::store::{BoxFuture, ObjectStore, Precondition, StoredObject};

struct Entry {
    body: Vec<u8>,
    etag: String,
    content_type: Option<String>,
}

/// In-process object store. ETags are a monotonically increasing counter.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Entry>>,
    next_etag: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Entry>> {
        // a poisoned map is still structurally valid
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fresh_etag(&self) -> String {
        let n = self.next_etag.fetch_add(1, Ordering::Relaxed) + 1;
        format!("\"{n:016x}\"")
    }

    fn write(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        condition: Precondition<'_>,
    ) -> Result<String, StorageError> {
        let mut objects = self.lock();
        let current = objects.get(key).map(|e| e.etag.as_str());
        let allowed = match condition {
            Precondition::Unconditional => true,
            Precondition::IfMatch(expected) => current == Some(expected),
            Precondition::IfAbsent => current.is_none(),
        };
        if !allowed {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        let etag = self.fresh_etag();
        objects.insert(
            key.to_string(),
            Entry {
                body,
                etag: etag.clone(),
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(etag)
    }
}

impl ObjectStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<StoredObject, StorageError>> {
        Box::pin(async move {
            let objects = self.lock();
            let entry = objects.get(key).ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })?;
            Ok(StoredObject {
                body: entry.body.clone(),
                etag: Some(entry.etag.clone()),
                content_type: entry.content_type.clone(),
            })
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            self.write(key, body, content_type, Precondition::Unconditional)
        })
    }

    fn put_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            self.write(key, body, content_type, Precondition::IfMatch(expected_etag))
        })
    }

    fn put_if_absent<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move { self.write(key, body, content_type, Precondition::IfAbsent) })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.lock().remove(key);
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            Ok(self
                .lock()
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect())
        })
    }
}
