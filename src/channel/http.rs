//! HTTP channel: posts envelopes to a bridge server's `/rpc` route.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::{BridgeError, Result};
use crate::proto::{RpcRequest, RpcResponse};

use super::BridgeChannel;

pub struct HttpChannel {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChannel {
    /// `endpoint` is the full URL of the server's rpc route,
    /// e.g. `http://127.0.0.1:9309/rpc`. No bridge-level timeout is applied
    /// unless one is configured.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.call_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BridgeError::config(format!("http client: {e}")))?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl BridgeChannel for HttpChannel {
    async fn call(&self, request: RpcRequest) -> Result<RpcResponse> {
        let id = request.id;
        tracing::debug!("posting {} to {}", request.method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| BridgeError::transport(e.to_string()))?;

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::transport(format!("malformed response envelope: {e}")))?;

        if response.id != Some(id) {
            return Err(BridgeError::transport(format!(
                "response id mismatch: sent {id}, got {:?}",
                response.id
            )));
        }
        Ok(response)
    }
}
