//! Types for the token registry

use rating_types::{Address, AssetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest decimal precision a registered asset may declare.
pub const MAX_DECIMALS: u32 = 15;

/// Longest accepted symbol.
pub const MAX_SYMBOL_LENGTH: usize = 40;

/// Human ticker of an asset, e.g. `USDC`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenSymbol(pub String);

impl TokenSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case ASCII letters, digits and `_`, 1 to 40 characters.
    pub fn is_valid(&self) -> bool {
        let s = &self.0;
        !s.is_empty()
            && s.len() <= MAX_SYMBOL_LENGTH
            && s
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration request for a secondary asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRegistration {
    pub symbol: TokenSymbol,
    pub asset: AssetId,
    pub decimals: u32,
    #[serde(default)]
    pub description: String,
    pub registrant: Option<Address>,
}

/// What the registry knows about an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub asset: AssetId,
    pub symbol: TokenSymbol,
    pub decimals: u32,
    pub description: String,
    pub registrant: Option<Address>,
}

/// Result of a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Updated,
}
