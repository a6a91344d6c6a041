//! Registry and oracle lookups feeding the conversion engine.

use crate::conversion::{UsdRates, Valuation};
use crate::errors::{AgentError, Result};
use rating_oracle::{feed_name, PriceOracle};
use rating_registry::TokenRegistry;
use rating_types::{Address, AssetId, AssetRef, BASE_DECIMALS};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Resolves precision and live USD rates for inbound assets.
///
/// Every call reads the registry and the oracle afresh; nothing is cached.
#[derive(Clone)]
pub struct RateResolver {
    registry: Arc<dyn TokenRegistry>,
    oracle: Arc<dyn PriceOracle>,
    base_symbol: String,
    quote_symbol: String,
    /// Oracles whose feeds are honoured. Empty honours any.
    oracles: BTreeSet<Address>,
}

impl RateResolver {
    pub fn new(
        registry: Arc<dyn TokenRegistry>,
        oracle: Arc<dyn PriceOracle>,
        base_symbol: impl Into<String>,
        quote_symbol: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            oracle,
            base_symbol: base_symbol.into(),
            quote_symbol: quote_symbol.into(),
            oracles: BTreeSet::new(),
        }
    }

    /// Only price with feeds posted by `oracles`.
    pub fn with_oracles(mut self, oracles: impl IntoIterator<Item = Address>) -> Self {
        self.oracles = oracles.into_iter().collect();
        self
    }

    /// Digits after the point in `asset`'s native unit.
    pub fn decimals_of(&self, asset: &AssetRef) -> Result<u32> {
        match asset {
            AssetRef::Base => Ok(BASE_DECIMALS),
            AssetRef::Asset(id) => Ok(self.registry.decimals_of(id)?),
        }
    }

    /// Latest `(asset_usd, base_usd)` pair for a secondary asset.
    pub fn resolve(&self, asset: &AssetId) -> Result<UsdRates> {
        let symbol = self.registry.symbol_of(asset)?;
        let asset_feed = feed_name(symbol.as_str(), &self.quote_symbol);
        let base_feed = feed_name(&self.base_symbol, &self.quote_symbol);

        let asset_usd = self.oracle.latest_from(&asset_feed, &self.oracles)?.value;
        let base_usd = self.oracle.latest_from(&base_feed, &self.oracles)?.value;

        debug!(
            target: "agent",
            "{} = {}, {} = {}",
            asset_feed,
            asset_usd,
            base_feed,
            base_usd
        );

        UsdRates::new(asset_usd, base_usd).ok_or(AgentError::RateUnavailable {
            feed: if asset_usd > rust_decimal::Decimal::ZERO {
                base_feed
            } else {
                asset_feed
            },
        })
    }

    /// Everything the conversion engine needs to value `asset`.
    ///
    /// Base-asset donations never consult the oracle.
    pub fn valuation(&self, asset: &AssetRef) -> Result<Valuation> {
        match asset {
            AssetRef::Base => Ok(Valuation::Base),
            AssetRef::Asset(id) => {
                let decimals = self.decimals_of(asset)?;
                let rates = self.resolve(id)?;
                Ok(Valuation::Secondary { decimals, rates })
            }
        }
    }
}

impl std::fmt::Debug for RateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("base_symbol", &self.base_symbol)
            .field("quote_symbol", &self.quote_symbol)
            .field("oracles", &self.oracles)
            .finish_non_exhaustive()
    }
}
