//! Untyped JSON records and read-only views over collections of them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// A single stored entity. Field order is preserved end to end.
pub type Record = Map<String, Value>;

/// A whole datastore document: collection name -> array of records.
pub type Database = Map<String, Value>;

/// Read-only access to the records of named collections.
///
/// Validators only ever need to scan; mutation goes through the store.
pub trait CollectionView {
    /// Iterate the records of `collection`. Unknown collections are empty.
    fn records<'a>(&'a self, collection: &str) -> Box<dyn Iterator<Item = &'a Record> + 'a>;
}

impl CollectionView for Database {
    fn records<'a>(&'a self, collection: &str) -> Box<dyn Iterator<Item = &'a Record> + 'a> {
        match self.get(collection).and_then(Value::as_array) {
            Some(items) => Box::new(items.iter().filter_map(Value::as_object)),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// `true` when `record[field]` exists and is not `null`.
pub fn is_present(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(|v| !v.is_null())
}

/// Format a timestamp the way browsers' `Date#toISOString` does
/// (`2024-01-02T03:04:05.678Z`).
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether any record in `collection` has `field` equal to `value`, ignoring
/// case. Missing or non-string fields compare as the empty string.
pub fn unique_ci(view: &dyn CollectionView, collection: &str, field: &str, value: &str) -> bool {
    let needle = value.to_lowercase();
    !view.records(collection).any(|r| {
        let existing = r.get(field).and_then(Value::as_str).unwrap_or("");
        existing.to_lowercase() == needle
    })
}
