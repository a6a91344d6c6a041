use crate::{Result, StateStore, StateValue, StateWrites};
use sled::{Batch, Db, Tree};
use std::collections::BTreeMap;
use std::path::Path;

const STATE_VARS_TREE: &str = "state_vars";

/// Sled-backed implementation
pub struct SledStateStore {
    db: Db,
    vars: Tree,
}

impl SledStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let vars = db.open_tree(STATE_VARS_TREE)?;
        tracing::debug!(target: "storage", "Opened state store with {} vars", vars.len());
        Ok(Self { db, vars })
    }

    /// Temporary database removed on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let vars = db.open_tree(STATE_VARS_TREE)?;
        Ok(Self { db, vars })
    }
}

impl StateStore for SledStateStore {
    fn get(&self, key: &str) -> Result<Option<StateValue>> {
        self.vars
            .get(key.as_bytes())?
            .map(|v| serde_json::from_slice(&v))
            .transpose()
            .map_err(Into::into)
    }

    fn commit(&self, writes: StateWrites) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let count = writes.len();
        let mut batch = Batch::default();
        for (key, value) in writes {
            batch.insert(key.as_bytes(), serde_json::to_vec(&value)?);
        }
        self.vars.apply_batch(batch)?;
        tracing::debug!(target: "storage", "Committed {} state vars", count);
        Ok(())
    }

    fn snapshot(&self) -> Result<BTreeMap<String, StateValue>> {
        let mut out = BTreeMap::new();
        for item in self.vars.iter() {
            let (key, value) = item?;
            let key = String::from_utf8_lossy(&key).into_owned();
            out.insert(key, serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}
