use crate::{Result, StateStore, StateValue, StateWrites};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory backend for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    vars: Arc<RwLock<BTreeMap<String, StateValue>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<StateValue>> {
        Ok(self.vars.read().get(key).cloned())
    }

    fn commit(&self, writes: StateWrites) -> Result<()> {
        let mut vars = self.vars.write();
        for (key, value) in writes {
            vars.insert(key, value);
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<BTreeMap<String, StateValue>> {
        Ok(self.vars.read().clone())
    }
}
