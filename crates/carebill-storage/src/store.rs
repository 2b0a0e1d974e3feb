use std::future::Future;
use std::pin::Pin;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub const JSON: &str = "application/json";

/// Result of a GET operation, including the body and ETag.
pub struct StoredObject {
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

/// Condition attached to a write.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Precondition<'a> {
    Unconditional,
    IfMatch(&'a str),
    IfAbsent,
}

/// Key/value object storage with ETag preconditions.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ObjectStore: Send + Sync {
    /// Fetch an object. Missing keys are [`StorageError::NotFound`].
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<StoredObject, StorageError>>;

    /// Write an object unconditionally. Returns the new ETag.
    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Write only if the stored ETag still equals `expected_etag`; otherwise
    /// [`StorageError::PreconditionFailed`]. Returns the new ETag.
    fn put_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Write only if no object exists under `key` yet; otherwise
    /// [`StorageError::PreconditionFailed`]. Returns the new ETag.
    fn put_if_absent<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>>;

    /// All keys under `prefix`, in lexicographic order.
    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StorageError>>;
}
