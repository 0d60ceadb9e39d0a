//! Demo extension process: registers a sample restore item action and
//! serves it over the configured transport. Doubles as the child binary
//! for exercising the process channel end to end.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use restore_bridge::{
    ActionRegistry, BridgeConfig, Dispatcher, ExecuteInput, ExecuteOutput, ResourceSelector,
    RestoreItemAction,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stamps `status: restored` onto the item it is handed.
struct StatusStamper;

#[async_trait]
impl RestoreItemAction for StatusStamper {
    async fn applies_to(&self) -> restore_bridge::Result<ResourceSelector> {
        Ok(ResourceSelector {
            included_resources: vec!["pods".to_string()],
            label_selector: "app=demo".to_string(),
            ..Default::default()
        })
    }

    async fn execute(&self, input: ExecuteInput) -> restore_bridge::Result<ExecuteOutput> {
        let mut updated = input.item;
        updated["status"] = json!("restored");
        Ok(ExecuteOutput::new(updated))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to stderr: stdout belongs to the rpc channel in stdio mode.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restore_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BridgeConfig::from_env()?;
    tracing::info!(
        "configuration loaded: transport={}, port={}",
        config.server.transport,
        config.server.port
    );

    let registry = ActionRegistry::builder()
        .register("plugins.io/status-stamper", Arc::new(StatusStamper) as _)
        .build();
    let names: Vec<_> = registry.names().collect();
    tracing::info!("registered actions: {}", names.join(", "));

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry)));

    match config.server.transport.to_lowercase().as_str() {
        "http" => {
            let addr = restore_bridge::server::start_http_server(
                dispatcher,
                &config.server.host,
                config.server.port,
            )
            .await?;
            tracing::info!("extension serving rpc on {addr}");
            tokio::signal::ctrl_c().await?;
            Ok(())
        }
        _ => {
            tracing::info!("extension serving rpc on stdio");
            restore_bridge::server::run_stdio(dispatcher).await?;
            Ok(())
        }
    }
}
