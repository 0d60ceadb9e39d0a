//! Callee-side dispatcher.
//!
//! Receives request envelopes from whatever transport is serving, resolves
//! the target action by plugin name, decodes the payload documents, invokes
//! the action under the fault guard, and serializes the outcome back into a
//! response envelope.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::action::{ExecuteInput, RestoreDescriptor};
use crate::codec;
use crate::error::{BridgeError, Result};
use crate::fault;
use crate::proto::{
    codes, methods, AppliesToParams, AppliesToResult, ExecuteParams, ExecuteResult, RpcError,
    RpcRequest, RpcResponse,
};
use crate::registry::ActionRegistry;

pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one request envelope. Never panics outward and never returns a
    /// transport-level failure of its own; every outcome is a response
    /// envelope.
    pub async fn handle(&self, request: RpcRequest) -> RpcResponse {
        let id = Some(request.id);
        tracing::debug!("dispatching method {}", request.method);

        let outcome = match request.method.as_str() {
            methods::APPLIES_TO => self.applies_to(request.params).await,
            methods::EXECUTE => self.execute(request.params).await,
            methods::PING => Ok(json!({ "ok": true })),
            other => {
                return RpcResponse::error(
                    id,
                    codes::METHOD_NOT_FOUND,
                    format!("method not found: {other}"),
                );
            }
        };

        match outcome {
            Ok(result) => RpcResponse::result(id, result),
            Err(err) => {
                tracing::error!("dispatch of {} failed: {err}", request.method);
                let RpcError { code, message } = RpcError::from_bridge(&err);
                RpcResponse::error(id, code, message)
            }
        }
    }

    async fn applies_to(&self, params: Value) -> Result<Value> {
        let params: AppliesToParams = decode_params(params)?;
        let action = self.registry.lookup(&params.plugin)?;

        let selector = fault::isolate(methods::APPLIES_TO, action.applies_to())
            .await?
            .map_err(forward_action_error)?;

        let result = AppliesToResult {
            included_namespaces: selector.included_namespaces,
            excluded_namespaces: selector.excluded_namespaces,
            included_resources: selector.included_resources,
            excluded_resources: selector.excluded_resources,
            selector: selector.label_selector,
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: ExecuteParams = decode_params(params)?;
        let action = self.registry.lookup(&params.plugin)?;

        // Payloads decode before anything is invoked.
        let item: Value = codec::decode(&params.item)?;
        let item_from_backup: Value = codec::decode(&params.item_from_backup)?;
        let restore: RestoreDescriptor = codec::decode(&params.restore)?;

        tracing::info!("executing restore item action for plugin {}", params.plugin);

        let input = ExecuteInput {
            item,
            item_from_backup,
            restore,
        };
        let output = fault::isolate(methods::EXECUTE, action.execute(input))
            .await?
            .map_err(forward_action_error)?;

        let result = ExecuteResult {
            updated_item: codec::encode(&output.updated_item)?,
            warning: output.warning.unwrap_or_default(),
        };
        Ok(serde_json::to_value(result)?)
    }
}

/// An error returned by the action itself is a domain failure; its message
/// content crosses the boundary unchanged.
fn forward_action_error(err: BridgeError) -> BridgeError {
    match err {
        err @ BridgeError::Action(_) => err,
        other => BridgeError::Action(other.to_string()),
    }
}

fn decode_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| BridgeError::protocol(format!("invalid params: {e}")))
}
