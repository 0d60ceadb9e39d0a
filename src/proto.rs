//! Wire envelopes exchanged between the stub and the dispatcher.
//!
//! The framing is JSON-RPC shaped: a request names a method and carries
//! method-specific params; a response carries either a result or a
//! `(code, message)` error. The boundary is lossy by design — only the code
//! and message survive the crossing, not rich error structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

pub mod methods {
    pub const APPLIES_TO: &str = "restore_item_action/applies_to";
    pub const EXECUTE: &str = "restore_item_action/execute";
    pub const PING: &str = "ping";
}

pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL: i32 = -32603;

    pub const UNKNOWN_PLUGIN: i32 = -32000;
    pub const SERIALIZATION: i32 = -32001;
    pub const ACTION_FAILED: i32 = -32002;
    pub const FAULT: i32 = -32003;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn result(id: Option<u64>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<u64>, code: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    /// Flatten a dispatch error into its wire representation. A recovered
    /// fault keeps its captured trace in the message so the host operator
    /// can see where the extension crashed.
    pub fn from_bridge(err: &BridgeError) -> Self {
        let (code, message) = match err {
            BridgeError::Serialization(_) => (codes::SERIALIZATION, err.to_string()),
            BridgeError::UnknownPlugin { .. } => (codes::UNKNOWN_PLUGIN, err.to_string()),
            BridgeError::Action(_) => (codes::ACTION_FAILED, err.to_string()),
            BridgeError::Fault { message, trace } => (
                codes::FAULT,
                format!("restore item action panicked: {message}\n{trace}"),
            ),
            BridgeError::Protocol(_) => (codes::INVALID_PARAMS, err.to_string()),
            BridgeError::Transport(_) | BridgeError::Config(_) => {
                (codes::INTERNAL, err.to_string())
            }
        };
        Self { code, message }
    }

    /// Rebuild a local error on the stub side. Faults keep their identity;
    /// every other remote failure collapses into an action error carrying
    /// the remote message verbatim.
    pub fn into_bridge(self) -> BridgeError {
        match self.code {
            codes::FAULT => BridgeError::Fault {
                message: self.message,
                trace: String::new(),
            },
            _ => BridgeError::Action(self.message),
        }
    }
}

// Method params and results. Payload documents travel as individually
// encoded byte blobs; only the plugin name and warning are plain fields.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliesToParams {
    pub plugin: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliesToResult {
    #[serde(default)]
    pub included_namespaces: Vec<String>,
    #[serde(default)]
    pub excluded_namespaces: Vec<String>,
    #[serde(default)]
    pub included_resources: Vec<String>,
    #[serde(default)]
    pub excluded_resources: Vec<String>,
    #[serde(default)]
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteParams {
    pub plugin: String,
    pub item: Vec<u8>,
    pub item_from_backup: Vec<u8>,
    pub restore: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResult {
    pub updated_item: Vec<u8>,
    /// Empty string means no warning.
    #[serde(default)]
    pub warning: String,
}
