//! RPC bridge for out-of-process restore item action plugins.
//!
//! A host process and an extension process each hold one side of the bridge:
//! the host talks to a [`RestoreItemActionStub`] that looks like a local
//! [`RestoreItemAction`]; the extension registers its implementations in an
//! [`ActionRegistry`] and serves them through a [`Dispatcher`] over HTTP or
//! stdio. A panic inside one registered action is contained at the dispatch
//! boundary and returned as an ordinary error.

pub mod action;
pub mod channel;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fault;
pub mod proto;
pub mod registry;
pub mod server;
pub mod stub;

pub use action::{
    ExecuteInput, ExecuteOutput, ResourceSelector, RestoreDescriptor, RestoreItemAction,
};
pub use channel::{BridgeChannel, ChildProcessChannel, HttpChannel};
pub use config::BridgeConfig;
pub use dispatch::Dispatcher;
pub use error::{BridgeError, Result};
pub use registry::{ActionRegistry, ActionRegistryBuilder};
pub use stub::RestoreItemActionStub;
