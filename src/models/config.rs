//! Configuration model loaded from external sources.

use std::env;
use std::path::Path;
use std::time::Duration;

use config::Config;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::types::{PerPage, TypeConstraintError};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_PER_PAGE_OPTIONS: [u32; 4] = [10, 25, 50, 100];
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error loading settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Invalid page size: {0}")]
    PageSize(#[from] TypeConstraintError),
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_page_sizes"))]
/// Settings shared by every list page of the dashboard.
pub struct DeskConfig {
    #[validate(url)]
    pub api_base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_per_page_options")]
    #[validate(length(min = 1))]
    pub per_page_options: Vec<u32>,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_per_page_options() -> Vec<u32> {
    DEFAULT_PER_PAGE_OPTIONS.to_vec()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn validate_page_sizes(config: &DeskConfig) -> Result<(), ValidationError> {
    if config.per_page_options.contains(&0) {
        return Err(ValidationError::new("per_page_options_zero"));
    }
    if !config.per_page_options.contains(&config.default_per_page) {
        return Err(ValidationError::new("default_per_page_not_allowed"));
    }
    Ok(())
}

impl DeskConfig {
    /// Builds a config for `api_base_url` with every other setting at its
    /// default.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            per_page_options: default_per_page_options(),
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Allowed page sizes as validated values.
    pub fn page_sizes(&self) -> Result<Vec<PerPage>, TypeConstraintError> {
        self.per_page_options
            .iter()
            .copied()
            .map(PerPage::new)
            .collect()
    }

    pub fn initial_per_page(&self) -> Result<PerPage, TypeConstraintError> {
        PerPage::new(self.default_per_page)
    }

    /// Loads `config/default.yaml`, the `config/{APP_ENV}.yaml` profile and
    /// `APP_*` environment variables, in that order of precedence.
    pub fn load() -> Result<Self, ConfigError> {
        // Select config profile (defaults to `local`).
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
        Self::load_from(Path::new("config"), &app_env)
    }

    pub fn load_from(dir: &Path, app_env: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join(app_env)).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("per_page_options"),
            )
            .build()?;

        let desk_config = settings.try_deserialize::<DeskConfig>()?;
        desk_config.validate()?;
        Ok(desk_config)
    }
}
