//! The RPC seam the stub rides on.
//!
//! A channel only knows how to send a request envelope and receive a
//! response envelope or a transport failure; everything else — method
//! semantics, payload encoding, error taxonomy — lives above it.

pub mod http;
pub mod process;

use async_trait::async_trait;

use crate::error::Result;
use crate::proto::{RpcRequest, RpcResponse};

#[async_trait]
pub trait BridgeChannel: Send + Sync {
    /// One round trip. Implementations must be safe to call concurrently;
    /// they may serialize calls internally but must not interleave
    /// request/response pairs.
    async fn call(&self, request: RpcRequest) -> Result<RpcResponse>;
}

pub use http::HttpChannel;
pub use process::ChildProcessChannel;
