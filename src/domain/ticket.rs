use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    /// Numeric status code as stored by the backend.
    pub status: i64,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub agent_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set on rows of the trashed tickets page.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub agent_id: Option<i64>,
    #[serde(default)]
    pub ticket_id: Option<i64>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}
