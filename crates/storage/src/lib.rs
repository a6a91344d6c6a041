//! State-variable storage for the rating agent.
//!
//! The agent's durable state is a flat key space of numbers and strings
//! (`asset`, `supply`, `rating*...`). Writes made while handling one trigger
//! are staged in a [`StateBatch`] and reach the backing [`StateStore`] in a
//! single atomic `commit`, or not at all.

use rating_types::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod batch;
mod memory;
mod sled_store;

pub use batch::{StateBatch, StateWrites};
pub use memory::MemoryStateStore;
pub use sled_store::SledStateStore;

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("State var {key} holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("State var {key} would overflow")]
    Overflow { key: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Value of a single state variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateValue {
    Number(Amount),
    Text(String),
}

impl StateValue {
    pub fn kind(&self) -> &'static str {
        match self {
            StateValue::Number(_) => "number",
            StateValue::Text(_) => "text",
        }
    }

    /// Plain JSON rendering used for state dumps.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            StateValue::Number(n) => rating_types::amount_to_json(*n),
            StateValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<Amount> for StateValue {
    fn from(value: Amount) -> Self {
        StateValue::Number(value)
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

/// Abstract state-variable store.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<StateValue>>;

    /// Apply all staged writes atomically.
    fn commit(&self, writes: StateWrites) -> Result<()>;

    /// Every state variable, ordered by key.
    fn snapshot(&self) -> Result<BTreeMap<String, StateValue>>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Numeric state var, zero when unset.
    fn get_number(&self, key: &str) -> Result<Amount> {
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

    /// Text state var, `None` when unset.
    fn get_text(&self, key: &str) -> Result<Option<String>> {
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
}
