//! # Store
//!
//! Persistence for every intake record.
//!
//! ## Requirements
//!
//! - Exact-match lookups on unique fields (email, username, registration number, patient id)
//! - Insert, full overwrite, delete
//! - No range queries, no joins
//!
//! ## Uniqueness
//!
//! The uniqueness guard checks before insert, but two submissions can both pass the check.
//! Inserts therefore claim their unique keys atomically and fail with [`StoreError::Conflict`]
//! when another record already holds one. Keys are claimed at insert and released at remove;
//! overwrites keep the keys of the original insert.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: one `RwLock`, every insert checks and claims under the write lock
//! - [`RedisStore`]: hashes per collection, keys claimed with `HSETNX`

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate value for {field}")]
    Conflict { field: String },

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Malformed document: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    pub field: String,
    pub value: String,
}

impl UniqueKey {
    pub fn new(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn next_id(&self, collection: &str) -> Result<u64, StoreError>;

    /// Fails with [`StoreError::Conflict`] without writing anything if a key is taken.
    async fn insert(
        &self,
        collection: &str,
        id: u64,
        unique: &[UniqueKey],
        document: Value,
    ) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: u64) -> Result<Option<Value>, StoreError>;

    /// Looks up a record by one of its unique keys. Fields that were not claimed as
    /// unique on insert are not indexed and never match.
    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Ascending by id.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    async fn replace(&self, collection: &str, id: u64, document: Value)
    -> Result<bool, StoreError>;

    async fn remove(&self, collection: &str, id: u64) -> Result<bool, StoreError>;
}

pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> u64;

    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }
}

pub async fn allocate_id<R: Record>(store: &dyn Store) -> Result<u64, StoreError> {
    store.next_id(R::COLLECTION).await
}

pub async fn create<R: Record>(store: &dyn Store, record: &R) -> Result<(), StoreError> {
    let document = serde_json::to_value(record)?;
    store
        .insert(R::COLLECTION, record.id(), &record.unique_keys(), document)
        .await
}

pub async fn fetch<R: Record>(store: &dyn Store, id: u64) -> Result<Option<R>, StoreError> {
    store
        .get(R::COLLECTION, id)
        .await?
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}

pub async fn find<R: Record>(
    store: &dyn Store,
    field: &str,
    value: &str,
) -> Result<Option<R>, StoreError> {
    store
        .find_by(R::COLLECTION, field, value)
        .await?
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}

pub async fn all<R: Record>(store: &dyn Store) -> Result<Vec<R>, StoreError> {
    store
        .list(R::COLLECTION)
        .await?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<R>, _>>()
        .map_err(StoreError::from)
}

pub async fn save<R: Record>(store: &dyn Store, record: &R) -> Result<bool, StoreError> {
    let document = serde_json::to_value(record)?;
    store.replace(R::COLLECTION, record.id(), document).await
}

pub async fn delete<R: Record>(store: &dyn Store, id: u64) -> Result<bool, StoreError> {
    store.remove(R::COLLECTION, id).await
}
