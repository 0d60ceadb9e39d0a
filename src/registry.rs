//! Plugin name to implementation bindings.
//!
//! The registry is populated during bootstrap and frozen before serving
//! begins, so lookups during the RPC-serving lifetime are plain reads with
//! no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::action::RestoreItemAction;
use crate::error::{BridgeError, Result};

#[derive(Default)]
pub struct ActionRegistryBuilder {
    actions: HashMap<String, Arc<dyn RestoreItemAction>>,
}

impl ActionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a plugin name to an implementation. Re-registering a name
    /// replaces the previous binding; bootstrap owns name uniqueness.
    pub fn register(
        mut self,
        name: impl Into<String>,
        action: Arc<dyn RestoreItemAction>,
    ) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn build(self) -> ActionRegistry {
        ActionRegistry {
            actions: self.actions,
        }
    }
}

/// Immutable name → implementation map, shared across concurrent dispatches.
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn RestoreItemAction>>,
}

impl ActionRegistry {
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::new()
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn RestoreItemAction>> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::unknown_plugin(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ExecuteInput, ExecuteOutput, ResourceSelector};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl RestoreItemAction for Noop {
        async fn applies_to(&self) -> Result<ResourceSelector> {
            Ok(ResourceSelector::default())
        }

        async fn execute(&self, input: ExecuteInput) -> Result<ExecuteOutput> {
            Ok(ExecuteOutput::new(input.item))
        }
    }

    #[test]
    fn lookup_is_deterministic() {
        let action: Arc<dyn RestoreItemAction> = Arc::new(Noop);
        let registry = ActionRegistry::builder()
            .register("plugins.io/noop", Arc::clone(&action))
            .build();

        let first = registry.lookup("plugins.io/noop").unwrap();
        let second = registry.lookup("plugins.io/noop").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &action));
    }

    #[test]
    fn unregistered_name_is_an_error() {
        let registry = ActionRegistry::builder()
            .register("plugins.io/noop", Arc::new(Noop) as Arc<dyn RestoreItemAction>)
            .build();

        let err = registry.lookup("plugins.io/other").unwrap_err();
        match err {
            BridgeError::UnknownPlugin { name } => assert_eq!(name, "plugins.io/other"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn later_registration_wins() {
        let a: Arc<dyn RestoreItemAction> = Arc::new(Noop);
        let b: Arc<dyn RestoreItemAction> = Arc::new(Noop);
        let registry = ActionRegistry::builder()
            .register("plugins.io/noop", Arc::clone(&a))
            .register("plugins.io/noop", Arc::clone(&b))
            .build();

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.lookup("plugins.io/noop").unwrap(), &b));
    }
}
