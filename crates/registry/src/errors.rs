//! Error types for the token registry

use rating_types::AssetId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Asset not registered: {asset}")]
    Unregistered { asset: AssetId },

    #[error("Symbol not registered: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("Invalid symbol format: {symbol}")]
    InvalidSymbol { symbol: String },

    #[error("Symbol {symbol} is reserved")]
    ReservedSymbol { symbol: String },

    #[error("Invalid decimals {decimals}, expected at most {max}")]
    InvalidDecimals { decimals: u32, max: u32 },

    #[error("Symbol {symbol} already names asset {asset}")]
    SymbolTaken { symbol: String, asset: AssetId },

    #[error("Asset {asset} already registered as {symbol}")]
    AssetTaken { asset: AssetId, symbol: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
