//! `mockrest-core`: shared building blocks for the mock REST services.
//!
//! This crate is storage- and HTTP-agnostic: it only knows about JSON records,
//! the validation error model and the hook each service plugs into the generic
//! collection router.

pub mod allowed;
pub mod error;
pub mod id;
pub mod interceptor;
pub mod record;

pub use allowed::AllowedValues;
pub use error::{DomainError, DomainResult};
pub use id::{Sequence, exists, id_matches};
pub use interceptor::{
    CREATED_AT, Interceptor, UPDATED_AT, WriteContext, default_create, new_entity,
    stamp_updated, with_leading_id,
};
pub use record::{CollectionView, Database, Record, is_present, timestamp, unique_ci};
