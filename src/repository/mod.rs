//! Read access to the dashboard's REST collection endpoints.

use async_trait::async_trait;

use crate::domain::query::ListQuery;
use crate::dto::api::ListEnvelope;
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// One GET against a collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Path relative to the API base url, e.g. `tickets/trashed`.
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl PageRequest {
    pub fn new(endpoint: impl Into<String>, query: &ListQuery) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: query.to_params(),
        }
    }

    /// Returns the value of a query parameter, if it is sent at all.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[async_trait]
pub trait CollectionReader: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> RepositoryResult<ListEnvelope>;
}
