//! Panic isolation at the dispatch boundary.
//!
//! Every dispatched invocation runs under this guard so that one broken
//! registered action cannot take down the server handling all other plugins.
//! A panic is converted into a normal [`BridgeError::Fault`] carrying the
//! panic message and a captured backtrace.

use std::any::Any;
use std::backtrace::Backtrace;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::{BridgeError, Result};

/// Extract a human-readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// Run `fut` and convert an unwind into an error value instead of letting it
/// propagate. `op` names the operation for diagnostics.
pub async fn isolate<T, F>(op: &str, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(value) => Ok(value),
        Err(payload) => {
            let message = panic_message(payload);
            let trace = Backtrace::force_capture().to_string();
            tracing::error!("panic in restore item action `{op}`: {message}");
            Err(BridgeError::Fault { message, trace })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn value_passes_through() {
        let out = isolate("test", async { 7 }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn panic_becomes_fault_error() {
        let err = isolate("test", async {
            panic!("boom: {}", 42);
        })
        .await
        .unwrap_err();

        match err {
            BridgeError::Fault { message, trace } => {
                assert_eq!(message, "boom: 42");
                assert!(!trace.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn static_str_payload_is_preserved() {
        let err = isolate("test", async {
            panic!("plain payload");
        })
        .await
        .unwrap_err();

        match err {
            BridgeError::Fault { message, .. } => assert_eq!(message, "plain payload"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
