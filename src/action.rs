//! The local interface an extension implements and the host calls.
//!
//! Both sides of the process boundary see the same trait: the extension
//! registers a concrete [`RestoreItemAction`] with the dispatcher, and the
//! host talks to a [`crate::stub::RestoreItemActionStub`] that implements the
//! same trait over an RPC channel.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Describes which resources an action applies to.
///
/// The bridge transports the selector unchanged; exclusion-over-inclusion
/// policy when both match is owned by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceSelector {
    pub included_namespaces: Vec<String>,
    pub excluded_namespaces: Vec<String>,
    pub included_resources: Vec<String>,
    pub excluded_resources: Vec<String>,
    /// Opaque label-selector expression, e.g. `app=foo`.
    pub label_selector: String,
}

/// The restore-job descriptor handed to an action alongside the item.
///
/// All fields default so partial descriptors decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RestoreDescriptor {
    pub name: String,
    pub backup_name: String,
    pub included_namespaces: Vec<String>,
    pub excluded_namespaces: Vec<String>,
    pub namespace_mapping: BTreeMap<String, String>,
    pub label_selector: Option<String>,
}

/// Inputs to [`RestoreItemAction::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteInput {
    /// The item as it is about to be restored.
    pub item: Value,
    /// The item as it existed at backup time.
    pub item_from_backup: Value,
    /// The restore job this item belongs to.
    pub restore: RestoreDescriptor,
}

/// Output of [`RestoreItemAction::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteOutput {
    /// The possibly-modified item.
    pub updated_item: Value,
    /// An informational caveat. `Some` never means failure: the restore
    /// proceeds with `updated_item` and surfaces the message to the operator.
    pub warning: Option<String>,
}

impl ExecuteOutput {
    pub fn new(updated_item: Value) -> Self {
        Self {
            updated_item,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

/// An action that can transform a resource item during a restore.
#[async_trait]
pub trait RestoreItemAction: Send + Sync {
    /// Which resources this action wants to see.
    async fn applies_to(&self) -> Result<ResourceSelector>;

    /// Transform one item. Returning an error aborts the restore of this
    /// item; a warning on the output does not.
    async fn execute(&self, input: ExecuteInput) -> Result<ExecuteOutput>;
}

impl std::fmt::Debug for dyn RestoreItemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn RestoreItemAction")
    }
}
