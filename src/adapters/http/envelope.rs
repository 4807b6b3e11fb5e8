//! Response envelope shared by every endpoint.
//!
//! Successful responses are `{success: true, ...}` with `data`, `count`,
//! `pagination`, `token` and `message` attached as each endpoint needs.
//! Error responses are produced by the `ApiError` responder and carry
//! `{success: false, message}`.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{ApiError, ListParams, ListResult, Pagination};

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// `{success: true, data}`.
    pub fn data<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Ok(Self {
            success: true,
            count: None,
            pagination: None,
            token: None,
            data: Some(to_value(value)?),
            message: None,
        })
    }

    /// `{success: true, data: {}}`, the shape delete endpoints return.
    pub fn empty() -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            token: None,
            data: Some(Value::Object(Default::default())),
            message: None,
        }
    }

    /// `{success: true, token}` for credential-issuing endpoints.
    pub fn token(token: String) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            token: Some(token),
            data: None,
            message: None,
        }
    }

    /// A paged list: `data` plus `count` (page size) and `pagination`
    /// windows, with the `select` projection applied.
    pub fn page<T: Serialize>(
        result: &ListResult<T>,
        params: &ListParams,
    ) -> Result<Self, ApiError> {
        let mut data = to_value(&result.items)?;
        if let Some(fields) = &params.select {
            project(&mut data, fields);
        }

        Ok(Self {
            success: true,
            count: Some(result.items.len() as u64),
            pagination: Some(Pagination::for_window(params.page, params.limit, result.total)),
            token: None,
            data: Some(data),
            message: None,
        })
    }

    /// An unpaged collection: `data` plus `count`.
    pub fn collection<T: Serialize>(items: &[T]) -> Result<Self, ApiError> {
        Ok(Self {
            success: true,
            count: Some(items.len() as u64),
            pagination: None,
            token: None,
            data: Some(to_value(items)?),
            message: None,
        })
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            token: None,
            data: None,
            message: Some(text.into()),
        }
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|err| ApiError::internal(format!("response serialization failed: {}", err)))
}

/// Retains only the selected keys on each object. `id` always survives so
/// projected records stay addressable.
fn project(data: &mut Value, fields: &[String]) {
    match data {
        Value::Array(items) => {
            for item in items {
                project(item, fields);
            }
        }
        Value::Object(map) => {
            map.retain(|key, _| key == "id" || fields.iter().any(|f| f == key));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_envelope_carries_count_and_pagination() {
        let result = ListResult {
            items: vec![json!({"id": "a", "name": "x", "phone": "1"})],
            total: 3,
        };
        let params = ListParams {
            limit: 1,
            ..Default::default()
        };

        let envelope = Envelope::page(&result, &params).unwrap();
        assert_eq!(envelope.count, Some(1));
        assert!(envelope.pagination.unwrap().next.is_some());
    }

    #[test]
    fn select_projection_keeps_id() {
        let result = ListResult {
            items: vec![json!({"id": "a", "name": "x", "phone": "1"})],
            total: 1,
        };
        let params = ListParams {
            select: Some(vec!["name".to_string()]),
            ..Default::default()
        };

        let envelope = Envelope::page(&result, &params).unwrap();
        assert_eq!(envelope.data.unwrap(), json!([{"id": "a", "name": "x"}]));
    }

    #[test]
    fn collection_envelope_counts_items_from_a_slice() {
        let items = vec![json!({"id": "a"}), json!({"id": "b"})];
        let envelope = Envelope::collection(&items).unwrap();
        assert_eq!(envelope.count, Some(2));
        assert!(envelope.pagination.is_none());
        assert_eq!(envelope.data.unwrap(), json!([{"id": "a"}, {"id": "b"}]));
    }

    #[test]
    fn empty_envelope_serializes_to_empty_object_data() {
        let body = serde_json::to_value(Envelope::empty()).unwrap();
        assert_eq!(body, json!({"success": true, "data": {}}));
    }
}
