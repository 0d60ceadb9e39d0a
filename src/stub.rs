//! Caller-side stub.
//!
//! Presents the same [`RestoreItemAction`] interface as the real
//! implementation and forwards each call over a [`BridgeChannel`]. Payload
//! documents are encoded before any channel interaction, so a value that
//! cannot be represented on the wire fails locally and no RPC is sent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::action::{ExecuteInput, ExecuteOutput, ResourceSelector, RestoreItemAction};
use crate::channel::BridgeChannel;
use crate::codec;
use crate::error::{BridgeError, Result};
use crate::proto::{
    methods, AppliesToParams, AppliesToResult, ExecuteParams, ExecuteResult, RpcRequest,
};

pub struct RestoreItemActionStub {
    plugin: String,
    channel: Arc<dyn BridgeChannel>,
    next_id: AtomicU64,
}

impl RestoreItemActionStub {
    pub fn new(plugin: impl Into<String>, channel: Arc<dyn BridgeChannel>) -> Self {
        Self {
            plugin: plugin.into(),
            channel,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let response = self
            .channel
            .call(RpcRequest {
                id,
                method: method.to_string(),
                params,
            })
            .await?;

        if let Some(err) = response.error {
            return Err(err.into_bridge());
        }
        response
            .result
            .ok_or_else(|| BridgeError::protocol("response carries neither result nor error"))
    }
}

#[async_trait]
impl RestoreItemAction for RestoreItemActionStub {
    async fn applies_to(&self) -> Result<ResourceSelector> {
        let params = serde_json::to_value(AppliesToParams {
            plugin: self.plugin.clone(),
        })?;
        let result = self.call(methods::APPLIES_TO, params).await?;
        let result: AppliesToResult = serde_json::from_value(result)
            .map_err(|e| BridgeError::protocol(format!("invalid applies_to result: {e}")))?;

        Ok(ResourceSelector {
            included_namespaces: result.included_namespaces,
            excluded_namespaces: result.excluded_namespaces,
            included_resources: result.included_resources,
            excluded_resources: result.excluded_resources,
            label_selector: result.selector,
        })
    }

    async fn execute(&self, input: ExecuteInput) -> Result<ExecuteOutput> {
        // All three payloads encode before the channel sees anything.
        let item = codec::encode(&input.item)?;
        let item_from_backup = codec::encode(&input.item_from_backup)?;
        let restore = codec::encode(&input.restore)?;

        let params = serde_json::to_value(ExecuteParams {
            plugin: self.plugin.clone(),
            item,
            item_from_backup,
            restore,
        })?;

        let result = self.call(methods::EXECUTE, params).await?;
        let result: ExecuteResult = serde_json::from_value(result)
            .map_err(|e| BridgeError::protocol(format!("invalid execute result: {e}")))?;

        let updated_item: Value = codec::decode(&result.updated_item)?;
        let warning = if result.warning.is_empty() {
            None
        } else {
            Some(result.warning)
        };

        Ok(ExecuteOutput {
            updated_item,
            warning,
        })
    }
}
