//! In-process ranking clients for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crash_map_dashboard_models::{RankingQuery, RankingResponse};
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::client::{RankingClient, RankingError};
use crate::query::ApiBase;

pub fn api() -> ApiBase {
    ApiBase::parse("http://127.0.0.1:8000").unwrap()
}

/// Body with a single "Main St" row and 1000 crashes in total.
pub fn main_st_response() -> Value {
    json!({
        "ranking": [{ "name": "Main St", "COUNT": 42, "CRASHES_PER_MONTH": 3.5 }],
        "total_crashes": 1000,
        "rank_type": "frequency",
        "group_by": "street"
    })
}

/// A `reqwest` error, as produced when a request never reaches the service.
pub fn transport_error() -> RankingError {
    RankingError::Http(reqwest::Client::new().get("http://").build().unwrap_err())
}

enum Reply {
    Body(Value),
    Unreachable,
}

/// Answers every query the same way and records what it was asked.
pub struct StubClient {
    reply: Reply,
    queries: Mutex<Vec<RankingQuery>>,
}

impl StubClient {
    pub fn replying(body: Value) -> Self {
        Self {
            reply: Reply::Body(body),
            queries: Mutex::default(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: Reply::Unreachable,
            queries: Mutex::default(),
        }
    }

    pub fn queries(&self) -> Vec<RankingQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RankingClient for StubClient {
    async fn fetch_ranking(&self, query: &RankingQuery) -> Result<RankingResponse, RankingError> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.reply {
            Reply::Body(body) => Ok(serde_json::from_value(body.clone())?),
            Reply::Unreachable => Err(transport_error()),
        }
    }
}

/// Holds each query's response until the test releases it, so tests decide
/// the order in which fetches resolve.
#[derive(Clone, Default)]
pub struct GatedClient {
    gates: Arc<Mutex<HashMap<RankingQuery, oneshot::Receiver<RankingResponse>>>>,
}

impl GatedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a gate for `query`; sending on the returned handle
    /// resolves the fetch.
    pub fn gate(&self, query: &RankingQuery) -> oneshot::Sender<RankingResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.clone(), rx);
        tx
    }

    /// Gates no fetch has picked up yet.
    pub fn waiting(&self) -> usize {
        self.gates.lock().unwrap().len()
    }
}

#[async_trait]
impl RankingClient for GatedClient {
    async fn fetch_ranking(&self, query: &RankingQuery) -> Result<RankingResponse, RankingError> {
        let rx = self
            .gates
            .lock()
            .unwrap()
            .remove(query)
            .unwrap_or_else(|| panic!("no gate registered for {query:?}"));
        Ok(rx.await.unwrap())
    }
}
