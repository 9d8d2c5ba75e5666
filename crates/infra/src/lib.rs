//! Infrastructure layer: the JSON-file datastore behind every service.

pub mod store;

pub use store::{
    CollectionStore, JsonFile, ListQuery, Page, Persistence, StoreError, StoreResult, UpdateMode,
    Volatile,
};
