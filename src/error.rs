use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no restore item action registered for plugin '{name}'")]
    UnknownPlugin { name: String },

    #[error("restore item action failed: {0}")]
    Action(String),

    #[error("restore item action panicked: {message}")]
    Fault { message: String, trace: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid rpc envelope: {0}")]
    Protocol(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    pub fn unknown_plugin(name: impl Into<String>) -> Self {
        BridgeError::UnknownPlugin { name: name.into() }
    }

    pub fn action(msg: impl Into<String>) -> Self {
        BridgeError::Action(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        BridgeError::Transport(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        BridgeError::Protocol(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BridgeError::Config(msg.into())
    }
}
