//! The hook each service plugs into the generic collection router.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DomainResult;
use crate::id::Sequence;
use crate::record::{CollectionView, Record, timestamp};

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Everything a hook may look at while a write is in flight.
///
/// `view` is the datastore as it is at the moment of the write; the store
/// keeps it locked until the resulting record has been persisted.
pub struct WriteContext<'a> {
    pub collection: &'a str,
    pub view: &'a dyn CollectionView,
    pub now: DateTime<Utc>,
    /// The update body replaces the stored record (PUT) instead of being
    /// merged into it (PATCH). Always `false` for creates.
    pub replace: bool,
}

impl<'a> WriteContext<'a> {
    pub fn new(collection: &'a str, view: &'a dyn CollectionView, now: DateTime<Utc>) -> Self {
        Self {
            collection,
            view,
            now,
            replace: false,
        }
    }

    /// Mark the write as a full replacement of the stored record.
    pub fn replacing(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// Request-time validation and enrichment for one service.
///
/// Implementations decide per collection what to do; collections they do not
/// care about should fall back to [`default_create`] and a no-op update.
pub trait Interceptor: Send + Sync {
    /// Validate a create body and build the complete record to persist.
    ///
    /// The returned record is exactly what gets stored and echoed back.
    fn on_create(&self, ctx: &WriteContext<'_>, body: Record) -> DomainResult<Record>;

    /// Validate and stamp a PUT/PATCH body in place.
    ///
    /// `existing` is the stored record the patch targets, if there is one.
    /// Hooks must not require it: a missing target is the router's concern.
    fn on_update(
        &self,
        ctx: &WriteContext<'_>,
        patch: &mut Record,
        existing: Option<&Record>,
    ) -> DomainResult<()>;
}

/// Generic insert behaviour: keep the body, assigning the next sequential
/// numeric id when the body has none.
pub fn default_create(ctx: &WriteContext<'_>, body: Record) -> Record {
    if body.get("id").is_some_and(|v| !v.is_null()) {
        return body;
    }
    with_leading_id(Value::from(Sequence::next(ctx.view, ctx.collection)), body)
}

/// Build a record whose first field is `id`, followed by `body`'s other fields.
pub fn with_leading_id(id: Value, body: Record) -> Record {
    let mut record = Record::new();
    record.insert("id".to_string(), id);
    for (k, v) in body {
        if k != "id" {
            record.insert(k, v);
        }
    }
    record
}

/// Build a new entity: `id` first, then `body`'s fields, then identical
/// `createdAt`/`updatedAt` stamps. Client-supplied values for those three
/// fields are discarded.
pub fn new_entity(id: Value, body: Record, now: DateTime<Utc>) -> Record {
    let mut record = with_leading_id(id, body);
    record.retain(|k, _| k != CREATED_AT && k != UPDATED_AT);
    let stamp = Value::String(timestamp(now));
    record.insert(CREATED_AT.to_string(), stamp.clone());
    record.insert(UPDATED_AT.to_string(), stamp);
    record
}

/// Set `updatedAt` on a patch.
pub fn stamp_updated(patch: &mut Record, now: DateTime<Utc>) {
    patch.insert(UPDATED_AT.to_string(), Value::String(timestamp(now)));
}
