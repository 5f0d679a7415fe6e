//! Scripted collection reader shared by the integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, json};
use tokio::sync::oneshot;

use pushkind_desk::dto::api::ListEnvelope;
use pushkind_desk::repository::errors::{RepositoryError, RepositoryResult};
use pushkind_desk::repository::{CollectionReader, PageRequest};

type Responder = Box<dyn Fn(&PageRequest) -> RepositoryResult<ListEnvelope> + Send + Sync>;

/// Records every request. Answers either immediately through a responder or
/// waits until the test resolves the request by index.
pub struct ScriptedReader {
    requests: Mutex<Vec<PageRequest>>,
    responder: Option<Responder>,
    gates: Mutex<Vec<Option<oneshot::Sender<RepositoryResult<ListEnvelope>>>>>,
}

impl ScriptedReader {
    /// Answers every request with a page of `last_page` pages.
    pub fn paged(last_page: u32) -> Self {
        Self::responding(move |request| Ok(page_for(request, last_page)))
    }

    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&PageRequest) -> RepositoryResult<ListEnvelope> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Some(Box::new(responder)),
            gates: Mutex::new(Vec::new()),
        }
    }

    /// Holds every request until [`ScriptedReader::resolve`] is called.
    pub fn gated() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: None,
            gates: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> PageRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was issued")
    }

    /// Waits until `count` requests have reached the reader.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..1000 {
            if self.request_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("expected {count} requests, got {}", self.request_count());
    }

    pub fn resolve(&self, index: usize, outcome: RepositoryResult<ListEnvelope>) {
        let gate = self.gates.lock().unwrap()[index]
            .take()
            .expect("request already resolved");
        let _ = gate.send(outcome);
    }
}

#[async_trait]
impl CollectionReader for ScriptedReader {
    async fn fetch_page(&self, request: &PageRequest) -> RepositoryResult<ListEnvelope> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(responder) = &self.responder {
            return responder(request);
        }

        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(RepositoryError::ConnectionError("dropped".to_string())))
    }
}

/// Builds the page the request asks for, with customer rows named after
/// their position.
pub fn page_for(request: &PageRequest, last_page: u32) -> ListEnvelope {
    let page: u32 = request.param("page").unwrap_or("1").parse().unwrap();
    let per_page: u32 = request.param("per_page").unwrap_or("10").parse().unwrap();
    let first = (page - 1) * per_page + 1;
    let data = (first..first + per_page)
        .map(|id| json!({"id": id, "name": format!("Customer {id}")}))
        .collect();

    ListEnvelope {
        data,
        current_page: page,
        last_page,
        total: u64::from(last_page * per_page),
        extensions: Map::new(),
    }
}

/// A single-page envelope with one customer called `name`.
pub fn single(name: &str) -> ListEnvelope {
    ListEnvelope {
        data: vec![json!({"id": 1, "name": name})],
        current_page: 1,
        last_page: 1,
        total: 1,
        extensions: Map::new(),
    }
}
