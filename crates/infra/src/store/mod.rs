//! JSON document store backing the generic collection router.

pub mod collection_store;
pub mod persistence;
pub mod query;

use std::path::PathBuf;

use thiserror::Error;

pub use collection_store::{CollectionStore, UpdateMode};
pub use persistence::{JsonFile, Persistence, Volatile};
pub use query::{ListQuery, Page, SortOrder};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Serde(#[from] serde_json::Error),

    /// The document does not have the expected shape.
    #[error("corrupt datastore: {0}")]
    Corrupt(String),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("a record with id {id} already exists in {collection}")]
    DuplicateId { collection: String, id: String },

    #[error("store lock poisoned")]
    Poisoned,
}
