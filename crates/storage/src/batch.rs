use crate::{Result, StateStore, StateValue, StorageError};
use rating_types::Amount;
use std::collections::BTreeMap;

/// Writes staged by a [`StateBatch`], ready to be committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateWrites(BTreeMap<String, StateValue>);

impl StateWrites {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for StateWrites {
    type Item = (String, StateValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, StateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Read-through write overlay over a [`StateStore`].
///
/// Reads see staged writes first. Nothing reaches the store until the
/// caller hands [`StateBatch::into_writes`] to [`StateStore::commit`];
/// dropping the batch discards everything it staged.
pub struct StateBatch<'a> {
    base: &'a dyn StateStore,
    writes: BTreeMap<String, StateValue>,
}

impl<'a> StateBatch<'a> {
    pub fn new(base: &'a dyn StateStore) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<StateValue>> {
        match self.writes.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get(key),
        }
    }

    pub fn get_number(&self, key: &str) -> Result<Amount> {
        match self.get(key)? {
            None => Ok(0),
            Some(StateValue::Number(n)) => Ok(n),
            Some(other) => Err(StorageError::TypeMismatch {
                key: key.to_string(),
                expected: "number",
                found: other.kind(),
            }),
        }
    }

    pub fn get_text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StateValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(StorageError::TypeMismatch {
                key: key.to_string(),
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.writes.insert(key.into(), value.into());
    }

    /// Add `delta` to a numeric var (unset reads as zero) and return the new value.
    pub fn add_number(&mut self, key: &str, delta: Amount) -> Result<Amount> {
        let current = self.get_number(key)?;
        let updated = current
            .checked_add(delta)
            .ok_or_else(|| StorageError::Overflow {
                key: key.to_string(),
            })?;
        self.set(key, updated);
        Ok(updated)
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> StateWrites {
        StateWrites(self.writes)
    }
}
