//! In-memory datastore document with write-through persistence.
//!
//! All writes go through one mutex. Hooks passed to [`CollectionStore::insert_with`]
//! and [`CollectionStore::update_with`] run while the lock is held and the
//! document is flushed before it is released, so reading existing records
//! (e.g. to pick the next id) and writing the new one form a single step.

use std::sync::{Mutex, MutexGuard};

use mockrest_core::{Database, Record, id_matches, with_leading_id};
use serde_json::Value;

use crate::store::{ListQuery, Page, Persistence, StoreError, StoreResult, Volatile};

/// How an update combines the stored record with the incoming body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PUT: the body becomes the record (the id is kept).
    Replace,
    /// PATCH: the body's fields are laid over the stored record.
    Merge,
}

pub struct CollectionStore {
    db: Mutex<Database>,
    persistence: Box<dyn Persistence>,
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore").finish_non_exhaustive()
    }
}

impl CollectionStore {
    /// Load the document and make sure every collection in `collections`
    /// exists as an array. The (possibly initialised) document is saved once.
    pub fn open(persistence: impl Persistence + 'static, collections: &[&str]) -> StoreResult<Self> {
        let mut db = persistence.load()?.unwrap_or_default();
        for name in collections {
            match db.get(*name) {
                None => {
                    db.insert((*name).to_string(), Value::Array(Vec::new()));
                }
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(StoreError::Corrupt(format!("collection {name} is not an array")));
                }
            }
        }
        persistence.save(&db)?;

        tracing::info!(collections = ?collection_names(&db), "datastore opened");
        Ok(Self {
            db: Mutex::new(db),
            persistence: Box::new(persistence),
        })
    }

    /// A store with nothing behind it, seeded with `seed`.
    pub fn in_memory(seed: Database) -> Self {
        Self {
            db: Mutex::new(seed),
            persistence: Box::new(Volatile),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Names of all array-valued entries in the document.
    pub fn collections(&self) -> StoreResult<Vec<String>> {
        Ok(collection_names(&*self.lock()?))
    }

    pub fn snapshot(&self) -> StoreResult<Database> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        let db = self.lock()?;
        let items = items(&*db, collection)?;
        Ok(position(items, id).and_then(|i| items[i].as_object().cloned()))
    }

    pub fn list(&self, collection: &str, query: &ListQuery) -> StoreResult<Page> {
        let db = self.lock()?;
        Ok(query.apply(items(&*db, collection)?))
    }

    /// Insert the record built by `build`.
    ///
    /// `build` sees the document as it is right before the insert; an error
    /// from it aborts the write.
    pub fn insert_with<F, E>(&self, collection: &str, build: F) -> Result<Record, E>
    where
        F: FnOnce(&Database) -> Result<Record, E>,
        E: From<StoreError>,
    {
        let mut db = self.lock()?;
        items(&*db, collection)?;
        let record = build(&*db)?;

        if let Some(id) = record.get("id").filter(|v| !v.is_null()) {
            if items(&*db, collection)?.iter().any(|r| r.get("id") == Some(id)) {
                return Err(StoreError::DuplicateId {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
                .into());
            }
        }

        items_mut(&mut db, collection)?.push(Value::Object(record.clone()));
        if let Err(e) = self.persistence.save(&*db) {
            items_mut(&mut db, collection)?.pop();
            return Err(e.into());
        }

        tracing::info!(collection, id = ?record.get("id"), "record inserted");
        Ok(record)
    }

    /// Update record `id` with `body`.
    ///
    /// `hook` may validate and amend the body; it runs before the existence
    /// check, so it sees `None` for a missing record and its rejection wins
    /// over "not found". Returns `Ok(None)` when no record matched.
    pub fn update_with<F, E>(
        &self,
        collection: &str,
        id: &str,
        mode: UpdateMode,
        mut body: Record,
        hook: F,
    ) -> Result<Option<Record>, E>
    where
        F: FnOnce(&Database, &mut Record, Option<&Record>) -> Result<(), E>,
        E: From<StoreError>,
    {
        let mut db = self.lock()?;
        body.retain(|k, _| k != "id");

        let (index, existing) = {
            let items = items(&*db, collection)?;
            let index = position(items, id);
            let existing = index.and_then(|i| items[i].as_object());
            hook(&*db, &mut body, existing)?;
            (index, existing.cloned())
        };
        let (Some(index), Some(existing)) = (index, existing) else {
            return Ok(None);
        };

        let updated = match mode {
            UpdateMode::Replace => {
                with_leading_id(existing.get("id").cloned().unwrap_or(Value::Null), body)
            }
            UpdateMode::Merge => {
                let mut merged = existing.clone();
                merged.extend(body);
                merged
            }
        };

        items_mut(&mut db, collection)?[index] = Value::Object(updated.clone());
        if let Err(e) = self.persistence.save(&*db) {
            items_mut(&mut db, collection)?[index] = Value::Object(existing);
            return Err(e.into());
        }

        tracing::info!(collection, id, ?mode, "record updated");
        Ok(Some(updated))
    }

    /// Delete record `id`, returning it. `Ok(None)` when no record matched.
    pub fn remove(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        let mut db = self.lock()?;
        let Some(index) = position(items(&*db, collection)?, id) else {
            return Ok(None);
        };

        let removed = items_mut(&mut db, collection)?.remove(index);
        if let Err(e) = self.persistence.save(&*db) {
            items_mut(&mut db, collection)?.insert(index, removed);
            return Err(e);
        }

        tracing::info!(collection, id, "record removed");
        Ok(match removed {
            Value::Object(record) => Some(record),
            _ => None,
        })
    }
}

fn collection_names(db: &Database) -> Vec<String> {
    db.iter()
        .filter(|(_, v)| v.is_array())
        .map(|(k, _)| k.clone())
        .collect()
}

fn items<'a>(db: &'a Database, collection: &str) -> StoreResult<&'a Vec<Value>> {
    db.get(collection)
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
}

fn items_mut<'a>(db: &'a mut Database, collection: &str) -> StoreResult<&'a mut Vec<Value>> {
    db.get_mut(collection)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
}

fn position(items: &[Value], id: &str) -> Option<usize> {
    items
        .iter()
        .position(|r| r.get("id").is_some_and(|v| id_matches(v, id)))
}
