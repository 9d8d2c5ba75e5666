//! List queries over a collection, following the usual json-server
//! conventions: `field=value` filters, `_sort`/`_order`, `_page`/`_limit`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use mockrest_core::Record;
use serde_json::Value;

/// Page size used when `_page` is given without `_limit`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Parsed list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// field -> accepted values (a record matches when any value matches).
    pub filters: BTreeMap<String, Vec<String>>,
    pub sort: Option<String>,
    pub order: SortOrder,
    /// 1-based page number.
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// One page of results plus the number of matches before paging.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Record>,
    pub total: usize,
    pub paginated: bool,
}

impl ListQuery {
    /// Build a query from raw query-string pairs. Unknown `_`-prefixed
    /// parameters and unparsable numbers are ignored.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in params {
            let (key, value) = (key.into(), value.into());
            match key.as_str() {
                "_sort" => query.sort = Some(value),
                "_order" => {
                    query.order = if value.eq_ignore_ascii_case("desc") {
                        SortOrder::Desc
                    } else {
                        SortOrder::Asc
                    }
                }
                "_page" => query.page = value.parse().ok().filter(|p| *p > 0),
                "_limit" => query.limit = value.parse().ok(),
                k if k.starts_with('_') => {}
                _ => query.filters.entry(key).or_default().push(value),
            }
        }
        query
    }

    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }

    /// Filter, sort and page `items`. Non-object entries are skipped.
    pub fn apply<'a>(&self, items: impl IntoIterator<Item = &'a Value>) -> Page {
        let mut matched: Vec<&Record> = items
            .into_iter()
            .filter_map(Value::as_object)
            .filter(|r| self.matches(r))
            .collect();

        if let Some(field) = &self.sort {
            matched.sort_by(|a, b| {
                let ord = compare(a.get(field), b.get(field));
                match self.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        let total = matched.len();
        let (start, take) = match (self.page, self.limit) {
            (Some(page), limit) => {
                let size = limit.unwrap_or(DEFAULT_PAGE_SIZE);
                (page.saturating_sub(1).saturating_mul(size), size)
            }
            (None, Some(limit)) => (0, limit),
            (None, None) => (0, total),
        };

        Page {
            items: matched.into_iter().skip(start).take(take).cloned().collect(),
            total,
            paginated: self.is_paginated(),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|(field, accepted)| {
            let actual = record.get(field).map(text_form);
            accepted.iter().any(|want| actual.as_deref() == Some(want.as_str()))
        })
    }
}

/// How a stored value compares against a query-string value.
fn text_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => text_form(x).cmp(&text_form(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Vec<Value> {
        vec![
            json!({"id": 1, "status": "todo", "hours": 5}),
            json!({"id": 2, "status": "done", "hours": 12}),
            json!({"id": 3, "status": "todo", "hours": 1}),
            json!("not a record"),
        ]
    }

    fn ids(page: &Page) -> Vec<i64> {
        page.items.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn empty_query_returns_every_record() {
        let page = ListQuery::default().apply(&items());
        assert_eq!(ids(&page), [1, 2, 3]);
        assert_eq!(page.total, 3);
        assert!(!page.paginated);
    }

    #[test]
    fn filters_compare_text_form_and_or_repeated_values() {
        let q = ListQuery::from_params([("status", "todo")]);
        assert_eq!(ids(&q.apply(&items())), [1, 3]);

        let q = ListQuery::from_params([("id", "1"), ("id", "2")]);
        assert_eq!(ids(&q.apply(&items())), [1, 2]);

        let q = ListQuery::from_params([("status", "todo"), ("hours", "1")]);
        assert_eq!(ids(&q.apply(&items())), [3]);
    }

    #[test]
    fn numeric_sort_in_both_directions() {
        let q = ListQuery::from_params([("_sort", "hours")]);
        assert_eq!(ids(&q.apply(&items())), [3, 1, 2]);

        let q = ListQuery::from_params([("_sort", "hours"), ("_order", "desc")]);
        assert_eq!(ids(&q.apply(&items())), [2, 1, 3]);
    }

    #[test]
    fn paging_reports_total_before_slicing() {
        let q = ListQuery::from_params([("_page", "2"), ("_limit", "2")]);
        let page = q.apply(&items());
        assert_eq!(ids(&page), [3]);
        assert_eq!(page.total, 3);
        assert!(page.paginated);

        let q = ListQuery::from_params([("_limit", "1")]);
        assert_eq!(ids(&q.apply(&items())), [1]);
    }

    #[test]
    fn page_without_limit_uses_default_size() {
        let many: Vec<Value> = (1..=25).map(|i| json!({"id": i})).collect();
        let q = ListQuery::from_params([("_page", "3")]);
        assert_eq!(ids(&q.apply(&many)), [21, 22, 23, 24, 25]);
    }

    #[test]
    fn unknown_control_params_are_ignored() {
        let q = ListQuery::from_params([("_embed", "x"), ("_page", "zero")]);
        assert_eq!(q, ListQuery::default());
    }
}
