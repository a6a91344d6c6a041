//! One-shot definition of the reputation asset.

use crate::errors::{AgentError, Result};
use base64::{engine::general_purpose, Engine as _};
use rating_storage::StateBatch;
use rating_types::{AssetId, ASSET_KEY, SUPPLY_KEY};
use tracing::info;

/// Lifecycle of the reputation asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuanceState {
    Undefined,
    Defined(AssetId),
}

impl IssuanceState {
    pub fn asset(&self) -> Option<&AssetId> {
        match self {
            IssuanceState::Undefined => None,
            IssuanceState::Defined(asset) => Some(asset),
        }
    }
}

pub(crate) fn parse_state(stored: Option<String>) -> Result<IssuanceState> {
    match stored {
        None => Ok(IssuanceState::Undefined),
        Some(id) => AssetId::new(id)
            .map(IssuanceState::Defined)
            .map_err(|e| AgentError::CorruptState(format!("stored asset id: {e}"))),
    }
}

pub fn read_state(batch: &StateBatch<'_>) -> Result<IssuanceState> {
    parse_state(batch.get_text(ASSET_KEY)?)
}

/// Asset id allocated by the define trigger `trigger_unit` at `agent_address`.
pub fn derive_asset_id(agent_address: &str, trigger_unit: &str) -> Result<AssetId> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(agent_address.as_bytes());
    hasher.update(b":");
    hasher.update(trigger_unit.as_bytes());
    let encoded = general_purpose::STANDARD.encode(hasher.finalize().as_bytes());
    AssetId::new(encoded).map_err(|e| AgentError::InvalidConfig(format!("asset id: {e}")))
}

/// `UNDEFINED -> DEFINED`. Fails without writing anything once defined.
pub fn define(
    batch: &mut StateBatch<'_>,
    agent_address: &str,
    trigger_unit: &str,
) -> Result<AssetId> {
    if let IssuanceState::Defined(_) = read_state(batch)? {
        return Err(AgentError::AlreadyDefined);
    }

    let asset = derive_asset_id(agent_address, trigger_unit)?;
    batch.set(ASSET_KEY, asset.as_str());
    batch.set(SUPPLY_KEY, 0u128);

    info!(target: "issuance", "Defined rating asset {}", asset);
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_storage::{MemoryStateStore, StateStore};

    #[test]
    fn asset_id_is_deterministic_per_unit() {
        let a = derive_asset_id("AGENT", "unit-1").unwrap();
        assert_eq!(a, derive_asset_id("AGENT", "unit-1").unwrap());
        assert_ne!(a, derive_asset_id("AGENT", "unit-2").unwrap());
        assert_ne!(a, derive_asset_id("OTHER", "unit-1").unwrap());
        assert_eq!(a.as_str().len(), 44);
    }

    #[test]
    fn define_once() {
        let store = MemoryStateStore::new();
        let mut batch = StateBatch::new(&store);
        let asset = define(&mut batch, "AGENT", "u1").unwrap();
        assert_eq!(read_state(&batch).unwrap(), IssuanceState::Defined(asset.clone()));
        store.commit(batch.into_writes()).unwrap();

        let mut again = StateBatch::new(&store);
        assert!(matches!(
            define(&mut again, "AGENT", "u2"),
            Err(AgentError::AlreadyDefined)
        ));
        assert!(again.is_empty());
        assert_eq!(store.get_text(ASSET_KEY).unwrap(), Some(asset.to_string()));
        assert_eq!(store.get_number(SUPPLY_KEY).unwrap(), 0);
    }
}
