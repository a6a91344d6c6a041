use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state_keys::KEY_SEPARATOR;

/// Errors raised when an identifier cannot be used as part of a state key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("identifier must not contain '{0}' or whitespace")]
    ForbiddenCharacter(char),
}

/// Longest accepted address string.
pub const MAX_ADDRESS_LENGTH: usize = 64;
/// Longest accepted project identifier.
pub const MAX_PROJECT_ID_LENGTH: usize = 256;

fn validate_identifier(value: &str, max: usize) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }
    let len = value.chars().count();
    if len > max {
        return Err(IdentifierError::TooLong { max, actual: len });
    }
    if let Some(c) = value
        .chars()
        .find(|c| *c == KEY_SEPARATOR || c.is_whitespace())
    {
        return Err(IdentifierError::ForbiddenCharacter(c));
    }
    Ok(())
}

/// Ledger address of a donor, oracle, notifier or the agent itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate_identifier(&value, MAX_ADDRESS_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External project key a donation is attributed to (e.g. `owner/repo`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate_identifier(&value, MAX_PROJECT_ID_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_rejects_key_separator() {
        assert_eq!(
            Address::new("ALICE*BOB"),
            Err(IdentifierError::ForbiddenCharacter('*'))
        );
        assert_eq!(Address::new(""), Err(IdentifierError::Empty));
        assert!(Address::new("2QVJOY3BRRGWP7IOYL64O5BU3WLUJ4TZ").is_ok());
    }

    #[test]
    fn project_id_allows_slashes() {
        let project = ProjectId::new("byteball/ocore").unwrap();
        assert_eq!(project.as_str(), "byteball/ocore");
        assert!(ProjectId::new("with space").is_err());
    }

    #[test]
    fn address_serde_validates() {
        let ok: Address = serde_json::from_str("\"DONOR\"").unwrap();
        assert_eq!(ok.as_str(), "DONOR");
        assert!(serde_json::from_str::<Address>("\"a*b\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"DONOR\"");
    }

    #[test]
    fn overlong_project_id_rejected() {
        let long = "p".repeat(MAX_PROJECT_ID_LENGTH + 1);
        assert_eq!(
            ProjectId::new(long),
            Err(IdentifierError::TooLong {
                max: MAX_PROJECT_ID_LENGTH,
                actual: MAX_PROJECT_ID_LENGTH + 1
            })
        );
    }
}
