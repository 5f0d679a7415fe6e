//! Mock collection reader for isolating controllers in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::dto::api::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CollectionReader, PageRequest};

mock! {
    pub CollectionReader {}

    #[async_trait]
    impl CollectionReader for CollectionReader {
        async fn fetch_page(&self, request: &PageRequest) -> RepositoryResult<ListEnvelope>;
    }
}
