//! Token registry implementation
//!
//! Keeps the symbol <-> asset mapping in both directions plus each asset's
//! declared decimals and description.

use crate::errors::*;
use crate::types::*;
use parking_lot::RwLock;
use rating_types::{AssetId, BASE_SYMBOL};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

/// Read side of the registry consumed by the rating agent.
pub trait TokenRegistry: Send + Sync {
    /// Digits after the point in the asset's native unit.
    fn decimals_of(&self, asset: &AssetId) -> Result<u32>;

    /// Symbol the asset is registered under.
    fn symbol_of(&self, asset: &AssetId) -> Result<TokenSymbol>;
}

#[derive(Debug, Default)]
pub struct InMemoryTokenRegistry {
    /// Asset -> registration record
    tokens: Arc<RwLock<HashMap<AssetId, TokenInfo>>>,
    /// Symbol -> asset
    symbol_to_asset: Arc<RwLock<HashMap<TokenSymbol, AssetId>>>,
}

impl InMemoryTokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secondary asset, or update the decimals and description
    /// of an existing symbol/asset pair.
    pub fn register(&self, registration: TokenRegistration) -> Result<RegistrationOutcome> {
        let TokenRegistration {
            symbol,
            asset,
            decimals,
            description,
            registrant,
        } = registration;

        if !symbol.is_valid() {
            return Err(RegistryError::InvalidSymbol {
                symbol: symbol.0,
            });
        }
        if symbol.as_str() == BASE_SYMBOL {
            return Err(RegistryError::ReservedSymbol { symbol: symbol.0 });
        }
        if decimals > MAX_DECIMALS {
            return Err(RegistryError::InvalidDecimals {
                decimals,
                max: MAX_DECIMALS,
            });
        }

        // Lock order: tokens, then symbols.
        let mut tokens = self.tokens.write();
        let mut symbols = self.symbol_to_asset.write();

        if let Some(existing) = symbols.get(&symbol) {
            if existing != &asset {
                return Err(RegistryError::SymbolTaken {
                    symbol: symbol.0,
                    asset: existing.clone(),
                });
            }
        }
        if let Some(info) = tokens.get(&asset) {
            if info.symbol != symbol {
                return Err(RegistryError::AssetTaken {
                    asset,
                    symbol: info.symbol.0.clone(),
                });
            }
        }

        let outcome = if tokens.contains_key(&asset) {
            RegistrationOutcome::Updated
        } else {
            RegistrationOutcome::Registered
        };

        symbols.insert(symbol.clone(), asset.clone());
        tokens.insert(
            asset.clone(),
            TokenInfo {
                asset: asset.clone(),
                symbol: symbol.clone(),
                decimals,
                description,
                registrant,
            },
        );

        info!(
            target: "registry",
            "{:?} {} as {} with {} decimals",
            outcome,
            asset,
            symbol,
            decimals
        );
        Ok(outcome)
    }

    /// Asset registered under `symbol`
    pub fn asset_of(&self, symbol: &TokenSymbol) -> Result<AssetId> {
        self.symbol_to_asset
            .read()
            .get(symbol)
            .cloned()
            .ok_or_else(|| RegistryError::SymbolNotFound {
                symbol: symbol.0.clone(),
            })
    }

    /// Full registration record
    pub fn get_info(&self, asset: &AssetId) -> Result<TokenInfo> {
        self.tokens
            .read()
            .get(asset)
            .cloned()
            .ok_or_else(|| RegistryError::Unregistered {
                asset: asset.clone(),
            })
    }

    pub fn description_of(&self, asset: &AssetId) -> Result<String> {
        self.get_info(asset).map(|info| info.description)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }

    /// Registry contents in the `s2a_` / `a2s_` / `decimals_` key layout.
    pub fn state_vars(&self) -> BTreeMap<String, serde_json::Value> {
        let tokens = self.tokens.read();
        let mut vars = BTreeMap::new();
        for info in tokens.values() {
            vars.insert(
                format!("s2a_{}", info.symbol),
                serde_json::Value::String(info.asset.to_string()),
            );
            vars.insert(
                format!("a2s_{}", info.asset),
                serde_json::Value::String(info.symbol.to_string()),
            );
            vars.insert(
                format!("decimals_{}", info.asset),
                serde_json::Value::from(info.decimals),
            );
        }
        vars
    }
}

impl TokenRegistry for InMemoryTokenRegistry {
    fn decimals_of(&self, asset: &AssetId) -> Result<u32> {
        self.get_info(asset).map(|info| info.decimals)
    }

    fn symbol_of(&self, asset: &AssetId) -> Result<TokenSymbol> {
        self.get_info(asset).map(|info| info.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(symbol: &str, asset: &str, decimals: u32) -> TokenRegistration {
        TokenRegistration {
            symbol: TokenSymbol::new(symbol),
            asset: AssetId::new(asset).unwrap(),
            decimals,
            description: format!("{symbol} token for testing"),
            registrant: None,
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = InMemoryTokenRegistry::new();
        let outcome = registry.register(registration("USDC", "usdc-asset", 4)).unwrap();
        assert_eq!(outcome, RegistrationOutcome::Registered);

        let asset = AssetId::new("usdc-asset").unwrap();
        assert_eq!(registry.decimals_of(&asset).unwrap(), 4);
        assert_eq!(registry.symbol_of(&asset).unwrap().as_str(), "USDC");
        assert_eq!(registry.asset_of(&TokenSymbol::new("USDC")).unwrap(), asset);
        assert_eq!(
            registry.description_of(&asset).unwrap(),
            "USDC token for testing"
        );
    }

    #[test]
    fn test_unregistered_asset() {
        let registry = InMemoryTokenRegistry::new();
        let asset = AssetId::new("nothing").unwrap();
        assert_eq!(
            registry.decimals_of(&asset),
            Err(RegistryError::Unregistered { asset })
        );
    }

    #[test]
    fn test_reregistration_updates_decimals() {
        let registry = InMemoryTokenRegistry::new();
        registry.register(registration("ETH", "eth-asset", 8)).unwrap();
        let outcome = registry.register(registration("ETH", "eth-asset", 9)).unwrap();
        assert_eq!(outcome, RegistrationOutcome::Updated);
        let asset = AssetId::new("eth-asset").unwrap();
        assert_eq!(registry.decimals_of(&asset).unwrap(), 9);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_conflicting_registrations_rejected() {
        let registry = InMemoryTokenRegistry::new();
        registry.register(registration("USDC", "usdc-asset", 4)).unwrap();

        assert!(matches!(
            registry.register(registration("USDC", "other-asset", 4)),
            Err(RegistryError::SymbolTaken { .. })
        ));
        assert!(matches!(
            registry.register(registration("USDT", "usdc-asset", 4)),
            Err(RegistryError::AssetTaken { .. })
        ));
        assert!(matches!(
            registry.register(registration("GBYTE", "fake-base", 9)),
            Err(RegistryError::ReservedSymbol { .. })
        ));
        assert!(matches!(
            registry.register(registration("usdc", "lower", 4)),
            Err(RegistryError::InvalidSymbol { .. })
        ));
        assert!(matches!(
            registry.register(registration("BIG", "big-asset", MAX_DECIMALS + 1)),
            Err(RegistryError::InvalidDecimals { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_state_vars_layout() {
        let registry = InMemoryTokenRegistry::new();
        registry.register(registration("USDC", "usdc-asset", 4)).unwrap();
        let vars = registry.state_vars();
        assert_eq!(vars["s2a_USDC"], serde_json::json!("usdc-asset"));
        assert_eq!(vars["a2s_usdc-asset"], serde_json::json!("USDC"));
        assert_eq!(vars["decimals_usdc-asset"], serde_json::json!(4));
    }
}
