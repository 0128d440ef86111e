//! In-process document store speaking the store protocol.
//!
//! Collections keep insertion order and a put on an existing id replaces the
//! document in place. Deleting an absent document is a no-op, as in the remote
//! store. A failure can be injected to simulate an unreachable server.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::JoinMeResult;
use crate::store::Transport;
use crate::store::protocol::{
    Command, DeleteDocument, Document, GetDocument, ListDocuments, PutDocument, Request, Response,
};

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Vec<Document>>,
    failure: Option<String>,
    latency: Option<Duration>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following request fail with `message` until [`recover`](Self::recover).
    pub async fn fail_with(&self, message: &str) {
        self.state.lock().await.failure = Some(message.to_string());
    }

    pub async fn recover(&self) {
        self.state.lock().await.failure = None;
    }

    /// Delay every reply by `latency`.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.state.lock().await.latency = latency;
    }

    /// Seed a raw document, bypassing entity serialization.
    pub async fn insert(&self, collection: &str, document: Document) {
        let mut state = self.state.lock().await;
        put(state.collections.entry(collection.to_string()).or_default(), document);
    }

    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        let state = self.state.lock().await;
        state.collections.get(collection).cloned().unwrap_or_default()
    }

    fn handle(state: &mut StoreState, request: Request) -> JoinMeResult<serde_json::Value> {
        match request.command {
            Command::ListDocuments => {
                let cmd: ListDocuments = serde_json::from_value(request.params)?;
                let docs = state.collections.get(&cmd.collection).cloned().unwrap_or_default();
                to_data(docs)
            }
            Command::GetDocument => {
                let cmd: GetDocument = serde_json::from_value(request.params)?;
                let doc = state
                    .collections
                    .get(&cmd.collection)
                    .and_then(|docs| docs.iter().find(|d| d.id == cmd.id).cloned());
                to_data(doc)
            }
            Command::PutDocument => {
                let cmd: PutDocument = serde_json::from_value(request.params)?;
                put(state.collections.entry(cmd.collection).or_default(), cmd.document);
                to_data(())
            }
            Command::DeleteDocument => {
                let cmd: DeleteDocument = serde_json::from_value(request.params)?;
                if let Some(docs) = state.collections.get_mut(&cmd.collection) {
                    docs.retain(|d| d.id != cmd.id);
                }
                to_data(())
            }
        }
    }
}

fn put(docs: &mut Vec<Document>, document: Document) {
    match docs.iter_mut().find(|d| d.id == document.id) {
        Some(existing) => *existing = document,
        None => docs.push(document),
    }
}

fn to_data<T: Serialize>(data: T) -> JoinMeResult<serde_json::Value> {
    Ok(serde_json::to_value(data)?)
}

#[async_trait]
impl Transport for MemoryStore {
    async fn send(&self, request: Request) -> JoinMeResult<Response<serde_json::Value>> {
        let latency = self.state.lock().await.latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;

        if let Some(error) = &state.failure {
            return Ok(Response::Error {
                error: error.clone(),
            });
        }

        Ok(match Self::handle(&mut state, request) {
            Ok(data) => Response::Success { data },
            Err(e) => Response::Error {
                error: e.to_string(),
            },
        })
    }
}
