//! Translation of typed list parameters into SQL.
//!
//! Every repository declares a column map from the public (camelCase)
//! field names to its SQL columns. Filters and sort keys arrive already
//! whitelisted by the parser, so an unmapped field here is a programming
//! error surfaced as a bad request rather than interpolated into SQL.
//! Values are always bound, never spliced.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::{ApiError, Filter, FilterOp, FilterValue, ListParams, SortKey};

/// A filterable column.
#[derive(Debug, Clone, Copy)]
pub enum Column {
    Scalar(&'static str),
    /// `text[]` column; `in` filters use array overlap semantics.
    TextArray(&'static str),
}

/// Public field name to column mapping for one table.
pub type ColumnMap = &'static [(&'static str, Column)];

fn resolve(field: &str, columns: ColumnMap) -> Result<Column, ApiError> {
    columns
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)
        .ok_or_else(|| ApiError::bad_request(format!("Cannot query on field: {}", field)))
}

fn op_sql(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => " = ",
        FilterOp::Lt => " < ",
        FilterOp::Lte => " <= ",
        FilterOp::Gt => " > ",
        FilterOp::Gte => " >= ",
        FilterOp::In => " IN ",
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Number(n) => builder.push_bind(*n),
        FilterValue::Bool(b) => builder.push_bind(*b),
        FilterValue::Text(t) => builder.push_bind(t.clone()),
    };
}

fn texts(values: &[FilterValue]) -> Vec<String> {
    values
        .iter()
        .map(|v| match v {
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Text(t) => t.clone(),
        })
        .collect()
}

/// Appends a WHERE clause for the given filters.
pub fn push_where(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[Filter],
    columns: ColumnMap,
) -> Result<(), ApiError> {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });

        match (resolve(&filter.field, columns)?, filter.op) {
            (Column::Scalar(name), FilterOp::In) => {
                builder.push(name).push(" IN (");
                for (j, value) in filter.values.iter().enumerate() {
                    if j > 0 {
                        builder.push(", ");
                    }
                    push_value(builder, value);
                }
                builder.push(")");
            }
            (Column::Scalar(name), op) => {
                builder.push(name).push(op_sql(op));
                let value = filter.values.first().ok_or_else(|| {
                    ApiError::bad_request(format!("Missing value for filter on {}", filter.field))
                })?;
                push_value(builder, value);
            }
            (Column::TextArray(name), FilterOp::In) => {
                // Overlap: any requested value present in the array.
                builder.push(name).push(" && ");
                builder.push_bind(texts(&filter.values));
            }
            (Column::TextArray(name), FilterOp::Eq) => {
                let value = filter.values.first().ok_or_else(|| {
                    ApiError::bad_request(format!("Missing value for filter on {}", filter.field))
                })?;
                push_value(builder, value);
                builder.push(" = ANY(").push(name).push(")");
            }
            (Column::TextArray(_), _) => {
                return Err(ApiError::bad_request(format!(
                    "Operator not supported on field: {}",
                    filter.field
                )));
            }
        }
    }
    Ok(())
}

/// Appends an ORDER BY clause for the given sort keys.
pub fn push_order(
    builder: &mut QueryBuilder<'_, Postgres>,
    sort: &[SortKey],
    columns: ColumnMap,
) -> Result<(), ApiError> {
    for (i, key) in sort.iter().enumerate() {
        let name = match resolve(&key.field, columns)? {
            Column::Scalar(name) | Column::TextArray(name) => name,
        };
        builder.push(if i == 0 { " ORDER BY " } else { ", " });
        builder.push(name);
        builder.push(if key.descending { " DESC" } else { " ASC" });
    }
    Ok(())
}

/// Appends LIMIT/OFFSET for the requested window.
pub fn push_window(builder: &mut QueryBuilder<'_, Postgres>, params: &ListParams) {
    builder.push(" LIMIT ").push_bind(i64::from(params.limit));
    builder.push(" OFFSET ").push_bind(params.offset() as i64);
}
