use std::time::Duration;

use crate::domain::query::is_reserved_param;
use crate::domain::types::{FilterKey, PerPage, TypeConstraintError};
use crate::models::config::{
    DEFAULT_PER_PAGE, DEFAULT_PER_PAGE_OPTIONS, DEFAULT_SEARCH_DEBOUNCE_MS, DeskConfig,
};

/// Per-page configuration of a [`super::ListController`].
#[derive(Clone, Debug, PartialEq)]
pub struct ListSettings {
    /// Collection endpoint relative to the API base url.
    pub endpoint: String,
    /// Filter parameters the endpoint understands.
    pub filter_keys: Vec<FilterKey>,
    pub sortable: bool,
    pub page_sizes: Vec<PerPage>,
    pub default_per_page: PerPage,
    pub search_debounce: Duration,
}

impl ListSettings {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TypeConstraintError> {
        let page_sizes = DEFAULT_PER_PAGE_OPTIONS
            .iter()
            .copied()
            .map(PerPage::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            endpoint: endpoint.into(),
            filter_keys: Vec::new(),
            sortable: false,
            page_sizes,
            default_per_page: PerPage::new(DEFAULT_PER_PAGE)?,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        })
    }

    /// Sets the supported filters. Paging, search and sort parameter names
    /// are rejected.
    pub fn with_filters(mut self, keys: &[&str]) -> Result<Self, TypeConstraintError> {
        self.filter_keys = keys
            .iter()
            .map(|key| {
                let key = FilterKey::new(*key)?;
                if is_reserved_param(key.as_str()) {
                    return Err(TypeConstraintError::InvalidValue(key.into()));
                }
                Ok(key)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self)
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Replaces page sizes and debounce with the dashboard-wide settings.
    pub fn with_config(mut self, config: &DeskConfig) -> Result<Self, TypeConstraintError> {
        self.page_sizes = config.page_sizes()?;
        self.default_per_page = config.initial_per_page()?;
        self.search_debounce = config.search_debounce();
        Ok(self)
    }

    pub fn filter_key(&self, key: &str) -> Option<&FilterKey> {
        let key = key.trim();
        self.filter_keys.iter().find(|k| k.as_str() == key)
    }

    pub fn page_size(&self, per_page: u32) -> Option<PerPage> {
        self.page_sizes
            .iter()
            .copied()
            .find(|size| size.get() == per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard() {
        let settings = ListSettings::new("tickets").unwrap();

        assert_eq!(settings.default_per_page.get(), 10);
        assert_eq!(settings.search_debounce, Duration::from_millis(300));
        assert!(settings.page_size(25).is_some());
        assert!(settings.page_size(30).is_none());
        assert!(!settings.sortable);
    }

    #[test]
    fn filters_are_looked_up_by_name() {
        let settings = ListSettings::new("tickets")
            .unwrap()
            .with_filters(&["status", "agent_id"])
            .unwrap();

        assert!(settings.filter_key(" status ").is_some());
        assert!(settings.filter_key("customer_id").is_none());
        assert!(ListSettings::new("tickets").unwrap().with_filters(&[""]).is_err());
    }

    #[test]
    fn reserved_parameter_names_are_not_filters() {
        for name in ["page", "per_page", "search", "sort_by", "sort_order"] {
            let result = ListSettings::new("tickets").unwrap().with_filters(&["status", name]);
            assert_eq!(result, Err(TypeConstraintError::InvalidValue(name.to_string())));
        }
    }
}
