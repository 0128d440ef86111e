//! Remote document store client.
//!
//! [`StoreClient`] turns typed [`StoreCommand`]s into protocol envelopes and
//! hands them to a [`Transport`]. Failures are surfaced to the caller as-is:
//! there is no retry and no backoff at this layer.

mod http;
mod memory;
pub mod protocol;

pub use http::HttpTransport;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{JoinMeError, JoinMeResult};
use crate::store::protocol::{Request, Response, StoreCommand};

/// Carries one request envelope to the store and returns its reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> JoinMeResult<Response<serde_json::Value>>;
}

#[derive(Clone)]
pub struct StoreClient {
    transport: Arc<dyn Transport>,
}

impl StoreClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        StoreClient { transport }
    }

    /// Call a typed store command and return the result.
    ///
    /// The response type is inferred from the command's associated type.
    pub async fn call<C: StoreCommand>(&self, cmd: C) -> JoinMeResult<C::Response> {
        let command = C::command();
        let params = serde_json::to_value(cmd)?;

        debug!(?command, "store call");
        let response = self.transport.send(Request { command, params }).await?;

        match response {
            Response::Success { data } => Ok(serde_json::from_value(data)?),
            Response::Error { error } => {
                debug!(?command, %error, "store call failed");
                Err(JoinMeError::Remote(error))
            }
        }
    }
}
