//! Typed list-query model.
//!
//! List endpoints accept `select`, `sort`, `page`, `limit` and field filters
//! of the form `field[op]=value`. Instead of forwarding raw query strings to
//! the store, the parser below produces a typed structure against a per-
//! resource field whitelist, rejecting unrecognized fields and operators.

use serde::Serialize;

use super::ApiError;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u32 = 25;

/// Default sort applied when the client does not specify one.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Comparison operator in a field filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

impl FilterOp {
    fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "lt" => Ok(FilterOp::Lt),
            "lte" => Ok(FilterOp::Lte),
            "gt" => Ok(FilterOp::Gt),
            "gte" => Ok(FilterOp::Gte),
            "in" => Ok(FilterOp::In),
            other => Err(ApiError::bad_request(format!(
                "Unrecognized filter operator: {}",
                other
            ))),
        }
    }
}

/// A filter value, coerced from its query-string representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FilterValue {
    /// Coerces a raw query value: numbers and booleans win over text.
    pub fn parse(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<f64>() {
            return FilterValue::Number(n);
        }
        match raw {
            "true" => FilterValue::Bool(true),
            "false" => FilterValue::Bool(false),
            _ => FilterValue::Text(raw.to_string()),
        }
    }
}

/// A single typed field filter.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    /// Exactly one value unless `op` is `In`.
    pub values: Vec<FilterValue>,
}

/// One sort key; `descending` comes from a `-` prefix in the query.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// Parsed list-endpoint parameters.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub filters: Vec<Filter>,
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            select: None,
            sort: vec![SortKey {
                field: DEFAULT_SORT_FIELD.to_string(),
                descending: true,
            }],
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    /// Parses raw query pairs against a field whitelist.
    pub fn parse(pairs: &[(String, String)], allowed_fields: &[&str]) -> Result<Self, ApiError> {
        let mut params = ListParams::default();
        let mut sorted = false;

        for (key, value) in pairs {
            match key.as_str() {
                "select" => {
                    let fields: Vec<String> =
                        value.split(',').map(|f| f.trim().to_string()).collect();
                    for field in &fields {
                        require_field(field, allowed_fields)?;
                    }
                    params.select = Some(fields);
                }
                "sort" => {
                    let mut keys = Vec::new();
                    for raw in value.split(',') {
                        let raw = raw.trim();
                        let (field, descending) = match raw.strip_prefix('-') {
                            Some(field) => (field, true),
                            None => (raw, false),
                        };
                        require_field(field, allowed_fields)?;
                        keys.push(SortKey {
                            field: field.to_string(),
                            descending,
                        });
                    }
                    params.sort = keys;
                    sorted = true;
                }
                "page" => {
                    params.page = parse_positive(value, "page")?;
                }
                "limit" => {
                    params.limit = parse_positive(value, "limit")?;
                }
                _ => {
                    params.filters.push(parse_filter(key, value, allowed_fields)?);
                }
            }
        }

        if !sorted {
            params.sort = ListParams::default().sort;
        }
        Ok(params)
    }

    /// Zero-based offset of the requested window.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(raw: &str, field: &str) -> Result<u32, ApiError> {
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ApiError::bad_request(format!(
            "Parameter '{}' must be a positive integer",
            field
        ))),
    }
}

fn require_field(field: &str, allowed: &[&str]) -> Result<(), ApiError> {
    if allowed.contains(&field) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Cannot query on field: {}",
            field
        )))
    }
}

/// Parses `field` or `field[op]` keys into a typed filter.
fn parse_filter(key: &str, value: &str, allowed: &[&str]) -> Result<Filter, ApiError> {
    let (field, op) = match key.split_once('[') {
        Some((field, rest)) => {
            let op_raw = rest.strip_suffix(']').ok_or_else(|| {
                ApiError::bad_request(format!("Malformed filter key: {}", key))
            })?;
            (field, FilterOp::parse(op_raw)?)
        }
        None => (key, FilterOp::Eq),
    };
    require_field(field, allowed)?;

    let values = if op == FilterOp::In {
        value.split(',').map(FilterValue::parse).collect()
    } else {
        vec![FilterValue::parse(value)]
    };

    Ok(Filter {
        field: field.to_string(),
        op,
        values,
    })
}

/// A page reference inside pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: u32,
    pub limit: u32,
}

/// Pagination metadata for list responses. `next` is present iff items
/// remain beyond the current window, `prev` iff the window starts past the
/// first item.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl Pagination {
    /// Computes pagination for a window over `total` matching items.
    pub fn for_window(page: u32, limit: u32, total: u64) -> Self {
        let end = u64::from(page) * u64::from(limit);
        let next = if end < total {
            Some(PageRef {
                page: page + 1,
                limit,
            })
        } else {
            None
        };
        let prev = if page > 1 {
            Some(PageRef {
                page: page - 1,
                limit,
            })
        } else {
            None
        };
        Self { next, prev }
    }
}

/// A page of items plus the total number of matches.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}
