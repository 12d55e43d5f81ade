//! # Redis
//!
//! Layout per collection:
//!
//! - `{collection}:rows`: hash, id -> JSON document
//! - `{collection}:next_id`: counter, `INCR` for new ids
//! - `{collection}:unique:{field}`: hash, value -> id, claimed with `HSETNX`
//! - `{collection}:keys`: hash, id -> JSON list of the unique keys the record holds
//!
//! A record holding several unique keys claims them one at a time, then writes the row.
//! The keys it got are released if a later claim or the row write fails.

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde_json::Value;
use tracing::warn;

use super::{Store, StoreError, UniqueKey};

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    client.get_connection_manager_with_config(config).await
}

fn rows_key(collection: &str) -> String {
    format!("{collection}:rows")
}

fn counter_key(collection: &str) -> String {
    format!("{collection}:next_id")
}

fn unique_key(collection: &str, field: &str) -> String {
    format!("{collection}:unique:{field}")
}

fn keys_key(collection: &str) -> String {
    format!("{collection}:keys")
}

/// The steps of an insert that holds unique keys.
#[async_trait]
trait ClaimedWrite: Send + Sync {
    /// False when another record already holds the key.
    async fn claim(&self, key: &UniqueKey) -> Result<bool, StoreError>;

    async fn release(&self, keys: &[UniqueKey]) -> Result<(), StoreError>;

    async fn write(&self) -> Result<(), StoreError>;
}

/// Claims every key, then writes. Whatever was claimed is released if a later
/// claim or the write fails.
async fn claim_then_write<W: ClaimedWrite>(
    op: &W,
    unique: &[UniqueKey],
) -> Result<(), StoreError> {
    let mut claimed: Vec<UniqueKey> = Vec::with_capacity(unique.len());

    let result = async {
        for key in unique {
            if !op.claim(key).await? {
                return Err(StoreError::Conflict {
                    field: key.field.clone(),
                });
            }
            claimed.push(key.clone());
        }

        op.write().await
    }
    .await;

    if result.is_err() && !claimed.is_empty() {
        if let Err(e) = op.release(&claimed).await {
            warn!("Failed to release unique keys: {e}");
        }
    }

    result
}

struct RowInsert<'a> {
    store: &'a RedisStore,
    collection: &'a str,
    id: u64,
    unique: &'a [UniqueKey],
    document: Value,
}

#[async_trait]
impl ClaimedWrite for RowInsert<'_> {
    async fn claim(&self, key: &UniqueKey) -> Result<bool, StoreError> {
        let mut connection = self.store.connection.clone();

        Ok(connection
            .hset_nx(unique_key(self.collection, &key.field), &key.value, self.id)
            .await?)
    }

    async fn release(&self, keys: &[UniqueKey]) -> Result<(), StoreError> {
        self.store.release(self.collection, keys).await
    }

    async fn write(&self) -> Result<(), StoreError> {
        let mut connection = self.store.connection.clone();
        let keys = serde_json::to_string(self.unique)?;

        let (): () = redis::pipe()
            .atomic()
            .hset(rows_key(self.collection), self.id, self.document.to_string())
            .ignore()
            .hset(keys_key(self.collection), self.id, keys)
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            connection: init_redis(redis_url).await?,
        })
    }

    async fn release(&self, collection: &str, keys: &[UniqueKey]) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();

        for key in keys {
            let _: u64 = connection
                .hdel(unique_key(collection, &key.field), &key.value)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn next_id(&self, collection: &str) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection.incr(counter_key(collection), 1u64).await?)
    }

    async fn insert(
        &self,
        collection: &str,
        id: u64,
        unique: &[UniqueKey],
        document: Value,
    ) -> Result<(), StoreError> {
        let insert = RowInsert {
            store: self,
            collection,
            id,
            unique,
            document,
        };

        claim_then_write(&insert, unique).await
    }

    async fn get(&self, collection: &str, id: u64) -> Result<Option<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let row: Option<String> = connection.hget(rows_key(collection), id).await?;

        Ok(row.as_deref().map(serde_json::from_str).transpose()?)
    }

    /// Only fields declared unique are indexed.
    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let id: Option<u64> = connection.hget(unique_key(collection, field), value).await?;

        match id {
            Some(id) => self.get(collection, id).await,
            None => Ok(None),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let rows: Vec<String> = connection.hvals(rows_key(collection)).await?;

        let mut documents = rows
            .iter()
            .map(|row| serde_json::from_str::<Value>(row))
            .collect::<Result<Vec<_>, _>>()?;
        documents.sort_by_key(|document| document.get("id").and_then(Value::as_u64));

        Ok(documents)
    }

    async fn replace(
        &self,
        collection: &str,
        id: u64,
        document: Value,
    ) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();

        let exists: bool = connection.hexists(rows_key(collection), id).await?;
        if !exists {
            return Ok(false);
        }

        let _: u64 = connection
            .hset(rows_key(collection), id, document.to_string())
            .await?;
        Ok(true)
    }

    async fn remove(&self, collection: &str, id: u64) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();

        let removed: u64 = connection.hdel(rows_key(collection), id).await?;
        if removed == 0 {
            return Ok(false);
        }

        let keys: Option<String> = connection.hget(keys_key(collection), id).await?;
        let keys: Vec<UniqueKey> = keys
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?
            .unwrap_or_default();

        self.release(collection, &keys).await?;
        let _: u64 = connection.hdel(keys_key(collection), id).await?;

        Ok(true)
    }
}
