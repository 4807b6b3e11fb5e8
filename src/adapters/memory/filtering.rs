//! In-process evaluation of typed list queries.
//!
//! Entities are serialized to JSON documents and the typed filters, sort
//! keys and page window are applied to those documents, mirroring what the
//! SQL adapter pushes down to the database.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::domain::{Filter, FilterOp, FilterValue, ListParams, ListResult};

/// Applies filters, sort and pagination to a snapshot of a collection.
pub(crate) fn select_page<T: Serialize + Clone>(items: &[T], params: &ListParams) -> ListResult<T> {
    let mut docs: Vec<(Value, T)> = items
        .iter()
        .map(|item| {
            let doc = serde_json::to_value(item).unwrap_or(Value::Null);
            (doc, item.clone())
        })
        .filter(|(doc, _)| params.filters.iter().all(|f| matches(doc, f)))
        .collect();

    docs.sort_by(|(a, _), (b, _)| {
        for key in &params.sort {
            let ord = compare_values(a.get(&key.field), b.get(&key.field));
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    let total = docs.len() as u64;
    let items = docs
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.limit as usize)
        .map(|(_, item)| item)
        .collect();

    ListResult { items, total }
}

fn matches(doc: &Value, filter: &Filter) -> bool {
    let field = match doc.get(&filter.field) {
        Some(v) => v,
        None => return false,
    };

    match filter.op {
        FilterOp::Eq => filter.values.first().is_some_and(|v| value_eq(field, v)),
        FilterOp::In => match field {
            // `in` on an array field means "contains any of the values".
            Value::Array(elements) => filter
                .values
                .iter()
                .any(|v| elements.iter().any(|e| value_eq(e, v))),
            _ => filter.values.iter().any(|v| value_eq(field, v)),
        },
        FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            let (Some(doc_n), Some(FilterValue::Number(filter_n))) =
                (field.as_f64(), filter.values.first())
            else {
                return false;
            };
            match filter.op {
                FilterOp::Lt => doc_n < *filter_n,
                FilterOp::Lte => doc_n <= *filter_n,
                FilterOp::Gt => doc_n > *filter_n,
                FilterOp::Gte => doc_n >= *filter_n,
                _ => unreachable!(),
            }
        }
    }
}

fn value_eq(doc: &Value, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Number(n) => doc.as_f64() == Some(*n),
        FilterValue::Bool(b) => doc.as_bool() == Some(*b),
        FilterValue::Text(s) => doc.as_str() == Some(s.as_str()),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => match (a.as_str(), b.as_str()) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => Ordering::Equal,
            },
        },
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct Doc {
        name: &'static str,
        rating: i32,
        tags: Vec<&'static str>,
    }

    fn docs() -> Vec<Doc> {
        vec![
            Doc {
                name: "a",
                rating: 4,
                tags: vec!["web"],
            },
            Doc {
                name: "b",
                rating: 9,
                tags: vec!["data", "web"],
            },
            Doc {
                name: "c",
                rating: 6,
                tags: vec!["mobile"],
            },
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListParams::parse(&pairs, &["name", "rating", "tags"]).unwrap()
    }

    #[test]
    fn numeric_comparison_filters() {
        let result = select_page(&docs(), &params(&[("rating[gte]", "6")]));
        assert_eq!(result.total, 2);
    }

    #[test]
    fn in_filter_matches_array_elements() {
        let result = select_page(&docs(), &params(&[("tags[in]", "web")]));
        assert_eq!(result.total, 2);
    }

    #[test]
    fn sort_and_window() {
        let result = select_page(&docs(), &params(&[("sort", "-rating"), ("limit", "2")]));
        assert_eq!(result.total, 3);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].name, "b");
        assert_eq!(result.items[1].name, "c");
    }

    #[test]
    fn second_page_returns_remainder() {
        let result = select_page(
            &docs(),
            &params(&[("sort", "-rating"), ("limit", "2"), ("page", "2")]),
        );
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "a");
    }
}
