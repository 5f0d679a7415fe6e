//! Rows of the invoices, payments and products pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accepts amounts sent either as JSON numbers or as decimal strings.
fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected an amount, got {other}"
        ))),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Invoice {
    pub id: i64,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub total: Option<f64>,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Payment {
    pub id: i64,
    #[serde(default)]
    pub invoice_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "amount")]
    pub net_amount: Option<f64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
}
