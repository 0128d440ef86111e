//! HTTP transport: POSTs protocol envelopes to a single endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{JoinMeError, JoinMeResult};
use crate::store::Transport;
use crate::store::protocol::{Request, Response};

pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: url::Url,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> JoinMeResult<Self> {
        let endpoint = url::Url::parse(endpoint)
            .map_err(|e| JoinMeError::Config(format!("Invalid store endpoint '{endpoint}': {e}")))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpTransport {
            http,
            endpoint,
            timeout,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> JoinMeResult<Response<serde_json::Value>> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JoinMeError::Timeout(self.timeout.as_secs())
                } else {
                    JoinMeError::Http(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = match resp.json::<ErrorResponse>().await {
                Ok(err) => err.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(JoinMeError::Remote(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        Ok(resp.json().await?)
    }
}
