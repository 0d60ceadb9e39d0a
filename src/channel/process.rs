//! Child-process channel: spawns the extension binary and speaks
//! newline-delimited JSON envelopes over its stdin/stdout.
//!
//! The extension side of this transport is [`crate::server::run_stdio`].
//! Calls are serialized with a mutex so request/response pairs never
//! interleave on the pipe; the child is killed when the channel drops.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::error::{BridgeError, Result};
use crate::proto::{RpcRequest, RpcResponse};

use super::BridgeChannel;

#[derive(Debug)]
pub struct ChildProcessChannel {
    io: Mutex<ChildIo>,
}

#[derive(Debug)]
struct ChildIo {
    // Held so the process is reaped with the channel.
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ChildProcessChannel {
    pub fn spawn(program: &str, args: &[&str]) -> Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BridgeError::transport(format!("spawn {program}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::transport("extension stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| BridgeError::transport("extension stdout unavailable"))?;

        tracing::info!("spawned extension process {program}");

        Ok(Self {
            io: Mutex::new(ChildIo {
                _child: child,
                stdin,
                stdout,
            }),
        })
    }
}

#[async_trait]
impl BridgeChannel for ChildProcessChannel {
    async fn call(&self, request: RpcRequest) -> Result<RpcResponse> {
        let id = request.id;
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');

        let mut io = self.io.lock().await;
        io.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| BridgeError::transport(format!("write to extension: {e}")))?;
        io.stdin
            .flush()
            .await
            .map_err(|e| BridgeError::transport(format!("flush to extension: {e}")))?;

        let mut reply = String::new();
        loop {
            reply.clear();
            let read = io
                .stdout
                .read_line(&mut reply)
                .await
                .map_err(|e| BridgeError::transport(format!("read from extension: {e}")))?;
            if read == 0 {
                return Err(BridgeError::transport("extension closed the channel"));
            }
            if !reply.trim().is_empty() {
                break;
            }
        }

        let response: RpcResponse = serde_json::from_str(reply.trim())
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
