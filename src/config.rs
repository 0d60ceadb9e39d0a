use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    /// 0 = auto-assign.
    pub port: u16,
    pub transport: String, // "stdio", "http"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the server's rpc route.
    pub endpoint: String,
    /// Per-call timeout. None preserves the default behavior: the caller
    /// waits for the extension without a bridge-level cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_secs: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9309,
                transport: "stdio".to_string(),
            },
            client: ClientConfig {
                endpoint: "http://127.0.0.1:9309/rpc".to_string(),
                call_timeout_secs: None,
            },
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("RESTORE_BRIDGE_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("RESTORE_BRIDGE_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| BridgeError::config("Invalid RESTORE_BRIDGE_PORT"))?;
        }

        if let Ok(transport) = std::env::var("RESTORE_BRIDGE_TRANSPORT") {
            config.server.transport = transport;
        }

        if let Ok(endpoint) = std::env::var("RESTORE_BRIDGE_ENDPOINT") {
            config.client.endpoint = endpoint;
        }

        if let Ok(timeout) = std::env::var("RESTORE_BRIDGE_CALL_TIMEOUT_SECS") {
            config.client.call_timeout_secs = Some(
                timeout
                    .parse()
                    .map_err(|_| BridgeError::config("Invalid RESTORE_BRIDGE_CALL_TIMEOUT_SECS"))?,
            );
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::config(format!("Failed to read config file: {e}")))?;

        let config: BridgeConfig = toml::from_str(&content)
            .map_err(|e| BridgeError::config(format!("Failed to parse config file: {e}")))?;

        Ok(config)
    }
}
