//! JSON shapes exchanged with the dashboard REST backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::list::ListResult;

/// Paginated collection envelope returned by every list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ListEnvelope {
    /// Rows of the requested page.
    pub data: Vec<Value>,
    pub current_page: u32,
    pub last_page: u32,
    /// Total number of rows matching the query.
    #[serde(alias = "total_items")]
    pub total: u64,
    /// Any other top-level fields, kept for resource-specific views.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ListEnvelope {
    /// Decodes the rows into `T`, preserving server order.
    pub fn into_result<T>(self) -> Result<ListResult<T>, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        let items = self
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(ListResult::new(items, self.current_page, self.last_page, self.total)
            .with_extensions(self.extensions))
    }
}

/// Error body sent by the backend with non-2xx responses.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Parses a raw response body, returning the first non-empty message.
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .message
            .into_iter()
            .chain(parsed.error)
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    #[test]
    fn envelope_keeps_extensions_and_order() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [{"id": 3}, {"id": 1}, {"id": 2}],
            "current_page": 1,
            "last_page": 4,
            "total": 31,
            "total_net_amount": "1200.00"
        }))
        .unwrap();

        let result: ListResult<Row> = envelope.into_result().unwrap();

        let ids: Vec<_> = result.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(result.total_items, 31);
        assert_eq!(result.extension("total_net_amount"), Some(&json!("1200.00")));
    }

    #[test]
    fn envelope_accepts_total_items_alias() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [],
            "current_page": 1,
            "last_page": 1,
            "total_items": 0
        }))
        .unwrap();

        assert_eq!(envelope.total, 0);
        assert!(envelope.extensions.is_empty());
    }

    #[test]
    fn malformed_row_fails_decoding() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [{"name": "no id"}],
            "current_page": 1,
            "last_page": 1,
            "total": 1
        }))
        .unwrap();

        assert!(envelope.into_result::<Row>().is_err());
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            ApiErrorBody::message_from(r#"{"message": "Invalid date range", "error": "x"}"#),
            Some("Invalid date range".to_string())
        );
        assert_eq!(
            ApiErrorBody::message_from(r#"{"message": " ", "error": "Server error"}"#),
            Some("Server error".to_string())
        );
        assert_eq!(ApiErrorBody::message_from("<html>502</html>"), None);
    }
}
