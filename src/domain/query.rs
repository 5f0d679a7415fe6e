//! The query a list page sends to its collection endpoint.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{FilterKey, PageNumber, PerPage};

/// Legacy literal the dashboard selects used for "no constraint".
pub const ALL_SENTINEL: &str = "all";

/// Parameter names owned by paging, search and sort. Never usable as filters.
pub const RESERVED_PARAMS: [&str; 5] = ["page", "per_page", "search", "sort_by", "sort_order"];

/// Whether `name` is a paging, search or sort parameter.
pub fn is_reserved_param(name: &str) -> bool {
    RESERVED_PARAMS.contains(&name)
}

/// Selected value of a single filter.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// No constraint for this key; the parameter is left out of the request.
    #[default]
    Unconstrained,
    /// Constrain the key to this exact value.
    Value(String),
}

impl FilterValue {
    /// Parses a raw select value, mapping empty input and `"all"` to
    /// [`FilterValue::Unconstrained`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            FilterValue::Unconstrained
        } else {
            FilterValue::Value(trimmed.to_string())
        }
    }

    /// Returns the constrained value, if any.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            FilterValue::Unconstrained => None,
            FilterValue::Value(value) => Some(value.as_str()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for FilterValue {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering requested from the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Current query of a list page.
///
/// Every edit other than [`ListQuery::go_to`] sends the query back to the
/// first page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    pub page: PageNumber,
    pub per_page: PerPage,
    pub search: String,
    pub sort: Option<Sort>,
    pub filters: BTreeMap<FilterKey, FilterValue>,
}

impl ListQuery {
    pub fn new(per_page: PerPage) -> Self {
        Self {
            page: PageNumber::FIRST,
            per_page,
            search: String::new(),
            sort: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.set_search(text);
        self
    }

    pub fn filter(mut self, key: FilterKey, value: impl Into<FilterValue>) -> Self {
        self.set_filter(key, value.into());
        self
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.set_sort(Some(sort));
        self
    }

    pub fn paginate(mut self, page: PageNumber) -> Self {
        self.go_to(page);
        self
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = PageNumber::FIRST;
    }

    pub fn set_filter(&mut self, key: FilterKey, value: FilterValue) {
        self.filters.insert(key, value);
        self.page = PageNumber::FIRST;
    }

    pub fn set_per_page(&mut self, per_page: PerPage) {
        self.per_page = per_page;
        self.page = PageNumber::FIRST;
    }

    pub fn set_sort(&mut self, sort: Option<Sort>) {
        self.sort = sort;
        self.page = PageNumber::FIRST;
    }

    /// Resets search, every filter and the page in one step. Page size and
    /// sort order are kept.
    pub fn clear(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.page = PageNumber::FIRST;
    }

    pub fn go_to(&mut self, page: PageNumber) {
        self.page = page;
    }

    /// Returns the value selected for `key`, treating a missing entry as
    /// unconstrained.
    pub fn filter_value(&self, key: &str) -> &FilterValue {
        static UNCONSTRAINED: FilterValue = FilterValue::Unconstrained;
        self.filters
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
            .unwrap_or(&UNCONSTRAINED)
    }

    /// Builds the query string parameters for this query.
    ///
    /// An empty search and unconstrained filters are omitted entirely.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];

        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search".to_string(), search.to_string()));
        }

        if let Some(sort) = &self.sort {
            params.push(("sort_by".to_string(), sort.field.clone()));
            params.push(("sort_order".to_string(), sort.direction.to_string()));
        }

        for (key, value) in &self.filters {
            if is_reserved_param(key.as_str()) {
                continue;
            }
            if let Some(value) = value.as_value() {
                params.push((key.to_string(), value.to_string()));
            }
        }

        params
    }
}
