//! Record identifiers: sequential numbering and lookups.

use serde_json::Value;

use crate::record::CollectionView;

/// Sequential identifier allocation, shared by every collection.
///
/// The next identifier is one past the largest numeric id in the collection.
/// An id counts as numeric when it is a JSON integer or a string made only of
/// ASCII digits; anything else counts as zero. Callers decide how to render
/// the number (tasks store it as a string, everything else as a number).
/// Numbering stops at `u64::MAX`; the store rejects the repeated id.
#[derive(Debug, Copy, Clone, Default)]
pub struct Sequence;

impl Sequence {
    pub fn next(view: &dyn CollectionView, collection: &str) -> u64 {
        view.records(collection)
            .map(|r| r.get("id").map(numeric_id).unwrap_or(0))
            .max()
            .map(|max| max.saturating_add(1))
            .unwrap_or(1)
    }
}

fn numeric_id(id: &Value) -> u64 {
    match id {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Whether a record with exactly this `id` exists in `collection`.
///
/// Comparison is strict JSON equality: the number `1` does not match the
/// string `"1"`.
pub fn exists(view: &dyn CollectionView, collection: &str, id: &Value) -> bool {
    view.records(collection).any(|r| r.get("id") == Some(id))
}

/// Whether a stored id matches an id taken from a URL path segment.
pub fn id_matches(id: &Value, segment: &str) -> bool {
    match id {
        Value::String(s) => s == segment,
        Value::Number(n) => n.to_string() == segment,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use serde_json::json;

    fn db(v: Value) -> Database {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_collection_starts_at_one() {
        let db = db(json!({"posts": []}));
        assert_eq!(Sequence::next(&db, "posts"), 1);
        assert_eq!(Sequence::next(&db, "missing"), 1);
    }

    #[test]
    fn next_is_max_plus_one_across_numbers_and_digit_strings() {
        let db = db(json!({"tasks": [{"id": "3"}, {"id": 9}, {"id": "task_40"}, {"id": "7"}]}));
        assert_eq!(Sequence::next(&db, "tasks"), 10);
    }

    #[test]
    fn non_numeric_ids_count_as_zero() {
        let db = db(json!({"roles": [{"id": "admin"}, {"name": "no id"}]}));
        assert_eq!(Sequence::next(&db, "roles"), 1);
    }

    #[test]
    fn next_saturates_at_the_largest_id() {
        let db = db(json!({
            "posts": [{"id": u64::MAX}],
            "tasks": [{"id": "18446744073709551615"}]
        }));
        assert_eq!(Sequence::next(&db, "posts"), u64::MAX);
        assert_eq!(Sequence::next(&db, "tasks"), u64::MAX);
    }

    #[test]
    fn exists_uses_strict_equality() {
        let db = db(json!({"users": [{"id": 1}]}));
        assert!(exists(&db, "users", &json!(1)));
        assert!(!exists(&db, "users", &json!("1")));
        assert!(!exists(&db, "users", &Value::Null));
    }

    #[test]
    fn path_segments_match_string_and_number_ids() {
        assert!(id_matches(&json!("12"), "12"));
        assert!(id_matches(&json!(12), "12"));
        assert!(!id_matches(&json!(12), "012"));
        assert!(!id_matches(&Value::Null, "null"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the next id is strictly greater than every numeric id.
            #[test]
            fn next_exceeds_every_existing_id(ids in proptest::collection::vec(0u64..100_000, 0..40)) {
                let items: Vec<Value> = ids.iter().map(|n| json!({"id": n})).collect();
                let db = db(json!({"c": items}));
                let next = Sequence::next(&db, "c");
                prop_assert!(ids.iter().all(|n| *n < next));
                prop_assert_eq!(next, ids.iter().max().map(|m| m + 1).unwrap_or(1));
            }
        }
    }
}
