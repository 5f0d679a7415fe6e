//! Saved list queries, e.g. the filters of the reports page.
//!
//! Storage is an explicit collaborator: a view loads a query when it mounts
//! and saves it after each change. Controllers never touch it.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::query::ListQuery;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait QueryStore {
    fn load_query(&self, key: &str) -> StoreResult<Option<ListQuery>>;
    fn save_query(&self, key: &str, query: &ListQuery) -> StoreResult<()>;
    fn remove_query(&self, key: &str) -> StoreResult<()>;
}

/// Keeps one JSON file per key in a directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl QueryStore for JsonFileStore {
    fn load_query(&self, key: &str) -> StoreResult<Option<ListQuery>> {
        let path = self.path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_query(&self, key: &str, query: &ListQuery) -> StoreResult<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, serde_json::to_vec_pretty(query)?)?;
        Ok(())
    }

    fn remove_query(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path(key)?) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::Sort;
    use crate::domain::types::{FilterKey, PerPage};

    #[test]
    fn saves_and_loads_a_query() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("reports"));
        let query = ListQuery::new(PerPage::new(25).unwrap())
            .search("acme")
            .filter(FilterKey::new("start_date").unwrap(), "2024-01-01")
            .filter(FilterKey::new("status").unwrap(), "all")
            .sorted(Sort::desc("total"));

        assert!(store.load_query("monthly").unwrap().is_none());

        store.save_query("monthly", &query).unwrap();
        assert_eq!(store.load_query("monthly").unwrap(), Some(query));

        store.remove_query("monthly").unwrap();
        store.remove_query("monthly").unwrap();
        assert!(store.load_query("monthly").unwrap().is_none());
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(matches!(
            store.load_query("../secrets"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
