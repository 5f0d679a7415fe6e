//! Reqwest-backed collection reader.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::dto::api::{ApiErrorBody, ListEnvelope};
use crate::models::config::DeskConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CollectionReader, PageRequest};

static USER_AGENT: &str = concat!("pushkind-desk/", env!("CARGO_PKG_VERSION"));

/// Reads collection pages from the dashboard REST API.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRepository {
    pub fn new(config: &DeskConfig) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl CollectionReader for HttpRepository {
    async fn fetch_page(&self, request: &PageRequest) -> RepositoryResult<ListEnvelope> {
        let mut builder = self
            .client
            .get(self.url(&request.endpoint))
            .query(&request.params);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(RepositoryError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                message: ApiErrorBody::message_from(&body),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<ListEnvelope>(&body)?)
    }
}
