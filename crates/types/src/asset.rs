use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name used in triggers for the base settlement asset.
pub const BASE_ASSET: &str = "base";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("asset id must not be empty")]
    Empty,
    #[error("asset id contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// Opaque identifier of a non-base asset (e.g. a unit hash).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn new(value: impl Into<String>) -> Result<Self, AssetError> {
        let value = value.into();
        if value.is_empty() {
            return Err(AssetError::Empty);
        }
        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || *c == crate::KEY_SEPARATOR)
        {
            return Err(AssetError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Either the base settlement asset or a secondary asset.
///
/// Serialised as `"base"` or as the asset id string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AssetRef {
    Base,
    Asset(AssetId),
}

impl AssetRef {
    pub fn is_base(&self) -> bool {
        matches!(self, AssetRef::Base)
    }

    pub fn as_asset(&self) -> Option<&AssetId> {
        match self {
            AssetRef::Base => None,
            AssetRef::Asset(id) => Some(id),
        }
    }
}

impl FromStr for AssetRef {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == BASE_ASSET {
            Ok(AssetRef::Base)
        } else {
            AssetId::new(s).map(AssetRef::Asset)
        }
    }
}

impl TryFrom<String> for AssetRef {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssetRef> for String {
    fn from(value: AssetRef) -> Self {
        match value {
            AssetRef::Base => BASE_ASSET.to_string(),
            AssetRef::Asset(id) => id.into(),
        }
    }
}

impl From<AssetId> for AssetRef {
    fn from(value: AssetId) -> Self {
        AssetRef::Asset(value)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Base => f.write_str(BASE_ASSET),
            AssetRef::Asset(id) => id.fmt(f),
        }
    }
}
