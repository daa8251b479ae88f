use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Names of the services this application has registered with the platform.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    names: Arc<RwLock<BTreeSet<String>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`. Returns `false` if it was already registered.
    pub fn register(&self, name: &str) -> bool {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Registered names in lexical order.
    pub fn names(&self) -> Vec<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}
