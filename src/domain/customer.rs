use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the customers page (`/customers-with-tickets`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Number of tickets opened by the customer.
    #[serde(default, alias = "tickets_count")]
    pub ticket_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
