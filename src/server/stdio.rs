//! Stdio transport: newline-delimited JSON envelopes.
//!
//! This is the extension side of [`crate::channel::ChildProcessChannel`]:
//! the host spawns the extension binary and the extension answers envelopes
//! read from stdin on stdout, one per line.

use std::sync::Arc;

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::dispatch::Dispatcher;
use crate::proto::{codes, RpcRequest, RpcResponse};

/// Answer envelopes from `reader` on `writer` until EOF.
///
/// An unparseable line gets a parse-error response with no id; everything
/// else goes through the dispatcher.
pub async fn serve_lines<R, W>(
    dispatcher: Arc<Dispatcher>,
    reader: R,
    mut writer: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = reader;
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        tracing::debug!("received envelope: {line}");

        let response = match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => dispatcher.handle(request).await,
            Err(e) => {
                tracing::error!("failed to parse request envelope: {e}");
                RpcResponse::error(None, codes::PARSE_ERROR, format!("parse error: {e}"))
            }
        };

        let mut out = serde_json::to_string(&response)
            .unwrap_or_else(|e| {
                // A response that cannot be encoded still has to answer.
                serde_json::to_string(&RpcResponse::error(
                    response.id,
                    codes::INTERNAL,
                    format!("failed to encode response: {e}"),
                ))
                .expect("error envelope is always encodable")
            });
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Serve the dispatcher over this process's stdin/stdout.
pub async fn run_stdio(dispatcher: Arc<Dispatcher>) -> io::Result<()> {
    tracing::info!("bridge serving on stdio");
    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    serve_lines(dispatcher, stdin, stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ExecuteInput, ExecuteOutput, ResourceSelector, RestoreItemAction};
    use crate::codec;
    use crate::proto::{methods, ExecuteParams, ExecuteResult};
    use crate::registry::ActionRegistry;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Stamper;

    #[async_trait]
    impl RestoreItemAction for Stamper {
        async fn applies_to(&self) -> crate::error::Result<ResourceSelector> {
            Ok(ResourceSelector::default())
        }

        async fn execute(&self, input: ExecuteInput) -> crate::error::Result<ExecuteOutput> {
            let mut updated = input.item;
            updated["status"] = json!("restored");
            Ok(ExecuteOutput::new(updated))
        }
    }

    fn test_dispatcher() -> Arc<Dispatcher> {
        let registry = ActionRegistry::builder()
            .register("plugins.io/my-action", Arc::new(Stamper) as _)
            .build();
        Arc::new(Dispatcher::new(Arc::new(registry)))
    }

    async fn round_trip(lines: &str) -> Vec<String> {
        let (client, server) = io::duplex(64 * 1024);
        let (server_read, server_write) = io::split(server);
        let serve = tokio::spawn(serve_lines(
            test_dispatcher(),
            BufReader::new(server_read),
            server_write,
        ));

        let (mut client_read, mut client_write) = io::split(client);
        client_write.write_all(lines.as_bytes()).await.unwrap();
        client_write.shutdown().await.unwrap();

        let mut out = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut client_read, &mut out)
            .await
            .unwrap();
        serve.await.unwrap().unwrap();

        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn execute_over_the_line_protocol() {
        let params = ExecuteParams {
            plugin: "plugins.io/my-action".to_string(),
            item: codec::encode(&json!({ "kind": "Pod" })).unwrap(),
            item_from_backup: codec::encode(&json!({ "kind": "Pod", "status": "old" })).unwrap(),
            restore: codec::encode(&json!({ "name": "r1" })).unwrap(),
        };
        let request = RpcRequest {
            id: 11,
            method: methods::EXECUTE.to_string(),
            params: serde_json::to_value(params).unwrap(),
        };
        let line = format!("{}\n", serde_json::to_string(&request).unwrap());

        let replies = round_trip(&line).await;
        assert_eq!(replies.len(), 1);

        let response: RpcResponse = serde_json::from_str(&replies[0]).unwrap();
        assert_eq!(response.id, Some(11));
        let result: ExecuteResult =
            serde_json::from_value(response.result.unwrap()).unwrap();
        let updated: Value = codec::decode(&result.updated_item).unwrap();
        assert_eq!(updated, json!({ "kind": "Pod", "status": "restored" }));
    }

    #[tokio::test]
    async fn unparseable_line_gets_a_parse_error() {
        let replies = round_trip("this is not an envelope\n").await;
        assert_eq!(replies.len(), 1);

        let response: RpcResponse = serde_json::from_str(&replies[0]).unwrap();
        assert_eq!(response.id, None);
        assert_eq!(response.error.unwrap().code, codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let ping = serde_json::to_string(&RpcRequest {
            id: 1,
            method: methods::PING.to_string(),
            params: Value::Null,
        })
        .unwrap();
        let replies = round_trip(&format!("\n\n{ping}\n\n")).await;
        assert_eq!(replies.len(), 1);

        let response: RpcResponse = serde_json::from_str(&replies[0]).unwrap();
        assert_eq!(response.result, Some(json!({ "ok": true })));
    }
}
