use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Store, StoreError, UniqueKey};

#[derive(Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<u64, Value>,
    /// field -> value -> id
    unique: HashMap<String, HashMap<String, u64>>,
    keys: HashMap<u64, Vec<UniqueKey>>,
}

impl Table {
    fn holder(&self, field: &str, value: &str) -> Option<u64> {
        self.unique.get(field)?.get(value).copied()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn next_id(&self, collection: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(collection.to_string()).or_default();

        table.next_id += 1;
        Ok(table.next_id)
    }

    async fn insert(
        &self,
        collection: &str,
        id: u64,
        unique: &[UniqueKey],
        document: Value,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(collection.to_string()).or_default();

        if table.rows.contains_key(&id) {
            return Err(StoreError::Conflict {
                field: "id".to_string(),
            });
        }

        if let Some(taken) = unique
            .iter()
            .find(|key| table.holder(&key.field, &key.value).is_some())
        {
            return Err(StoreError::Conflict {
                field: taken.field.clone(),
            });
        }

        for key in unique {
            table
                .unique
                .entry(key.field.clone())
                .or_default()
                .insert(key.value.clone(), id);
        }
        table.keys.insert(id, unique.to_vec());
        table.rows.insert(id, document);
        table.next_id = table.next_id.max(id);

        Ok(())
    }

    async fn get(&self, collection: &str, id: u64) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .get(collection)
            .and_then(|table| table.rows.get(&id))
            .cloned())
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(collection) else {
            return Ok(None);
        };

        Ok(table
            .holder(field, value)
            .and_then(|id| table.rows.get(&id).cloned()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .get(collection)
            .map(|table| table.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        collection: &str,
        id: u64,
        document: Value,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables
            .get_mut(collection)
            .and_then(|table| table.rows.get_mut(&id))
        {
            Some(row) => {
                *row = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, collection: &str, id: u64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(collection) else {
            return Ok(false);
        };

        if table.rows.remove(&id).is_none() {
            return Ok(false);
        }

        for key in table.keys.remove(&id).unwrap_or_default() {
            if let Some(values) = table.unique.get_mut(&key.field) {
                values.remove(&key.value);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn email(value: &str) -> Vec<UniqueKey> {
        vec![UniqueKey::new("email", value)]
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryStore::default();
        let id = store.next_id("users").await.unwrap();

        store
            .insert("users", id, &email("a@b.com"), json!({"id": id, "email": "a@b.com"}))
            .await
            .unwrap();

        let found = store.find_by("users", "email", "a@b.com").await.unwrap();
        assert_eq!(found, Some(json!({"id": 1, "email": "a@b.com"})));
        assert_eq!(store.find_by("users", "email", "c@d.com").await.unwrap(), None);
        assert_eq!(store.get("users", id).await.unwrap(), found);
    }

    #[tokio::test]
    async fn test_duplicate_key_conflicts_without_writing() {
        let store = MemoryStore::default();
        store
            .insert("users", 1, &email("a@b.com"), json!({"id": 1}))
            .await
            .unwrap();

        let err = store
            .insert("users", 2, &email("a@b.com"), json!({"id": 2}))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { field } if field == "email"));
        assert_eq!(store.list("users").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_one_winner() {
        let store = Arc::new(MemoryStore::default());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let id = store.next_id("projects").await.unwrap();
                    store
                        .insert(
                            "projects",
                            id,
                            &[UniqueKey::new("tu_registration_number", "7-2-39")],
                            json!({"id": id}),
                        )
                        .await
                })
            })
            .collect();

        let mut wins = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(store.list("projects").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_releases_keys() {
        let store = MemoryStore::default();
        store
            .insert("users", 1, &email("a@b.com"), json!({"id": 1}))
            .await
            .unwrap();

        assert!(store.remove("users", 1).await.unwrap());
        assert!(!store.remove("users", 1).await.unwrap());

        store
            .insert("users", 2, &email("a@b.com"), json!({"id": 2}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_replace_and_ordering() {
        let store = MemoryStore::default();
        for id in [2, 1, 3] {
            store
                .insert("notes", id, &[], json!({"id": id, "title": "t"}))
                .await
                .unwrap();
        }

        assert!(store.replace("notes", 2, json!({"id": 2, "title": "new"})).await.unwrap());
        assert!(!store.replace("notes", 9, json!({})).await.unwrap());

        let ids: Vec<u64> = store
            .list("notes")
            .await
            .unwrap()
            .iter()
            .filter_map(|row| row["id"].as_u64())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.next_id("notes").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_find_by_ignores_fields_not_claimed_unique() {
        let store = MemoryStore::default();
        store
            .insert(
                "users",
                1,
                &email("a@b.com"),
                json!({"id": 1, "email": "a@b.com", "username": "ada"}),
            )
            .await
            .unwrap();

        assert!(store.find_by("users", "email", "a@b.com").await.unwrap().is_some());
        assert_eq!(store.find_by("users", "username", "ada").await.unwrap(), None);
    }
}
