//! Result and state snapshots published by a list controller.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::query::ListQuery;
use crate::pagination;

/// One page of rows as answered by the server.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListResult<T> {
    /// Rows of the current page, in server order.
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub total_items: u64,
    /// Resource-specific top-level fields of the response, e.g.
    /// `total_net_amount` on payments.
    pub extensions: Map<String, Value>,
}

impl<T> ListResult<T> {
    /// Builds a result, clamping `current_page` into `1..=max(last_page, 1)`.
    pub fn new(items: Vec<T>, current_page: u32, last_page: u32, total_items: u64) -> Self {
        let current_page = current_page.clamp(1, last_page.max(1));
        Self {
            items,
            current_page,
            last_page,
            total_items,
            extensions: Map::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Highest page a view may navigate to.
    pub fn max_page(&self) -> u32 {
        self.last_page.max(1)
    }

    /// Page buttons to render, see [`pagination::page_window`].
    pub fn page_window(&self) -> Vec<Option<u32>> {
        pagination::page_window(self.last_page, self.current_page)
    }

    /// Reads a resource-specific extension field.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Externally observable state of a list page.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListState<T> {
    pub query: ListQuery,
    /// Last successfully fetched page. Kept while loading and after errors.
    pub result: Option<ListResult<T>>,
    pub status: ListStatus,
    pub error_message: Option<String>,
}

impl<T> ListState<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            query,
            result: None,
            status: ListStatus::Idle,
            error_message: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    /// Rows of the last good page, empty before the first success.
    pub fn items(&self) -> &[T] {
        self.result
            .as_ref()
            .map(|result| result.items.as_slice())
            .unwrap_or(&[])
    }

    /// Highest page [`crate::controller::ListController::set_page`] accepts.
    pub fn max_page(&self) -> u32 {
        self.result.as_ref().map_or(1, ListResult::max_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PerPage;

    #[test]
    fn new_result_clamps_current_page() {
        let result = ListResult::new(vec![1, 2], 0, 3, 22);
        assert_eq!(result.current_page, 1);

        let result = ListResult::new(Vec::<u8>::new(), 9, 3, 22);
        assert_eq!(result.current_page, 3);

        let result = ListResult::new(Vec::<u8>::new(), 4, 0, 0);
        assert_eq!(result.current_page, 1);
        assert_eq!(result.max_page(), 1);
    }

    #[test]
    fn fresh_state_is_idle_and_empty() {
        let state: ListState<String> = ListState::new(ListQuery::new(PerPage::new(10).unwrap()));

        assert_eq!(state.status, ListStatus::Idle);
        assert!(state.items().is_empty());
        assert_eq!(state.max_page(), 1);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn huge_last_page_still_renders_buttons() {
        let result = ListResult::new(Vec::<u8>::new(), 1, u32::MAX, 0);

        let pages = result.page_window();

        assert_eq!(pages.first(), Some(&Some(1)));
        assert_eq!(pages.last(), Some(&Some(u32::MAX)));
    }
}
