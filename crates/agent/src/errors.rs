use rating_oracle::OracleError;
use rating_registry::RegistryError;
use rating_storage::StorageError;
use rating_types::AssetId;
use thiserror::Error;

/// Every way a trigger can be rejected. Any of these bounces the trigger
/// with no state written.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("rating asset already defined")]
    AlreadyDefined,

    #[error("rating asset not defined yet")]
    NotDefined,

    #[error("no rate available for feed {feed}")]
    RateUnavailable { feed: String },

    #[error("asset {asset} is not registered")]
    UnregisteredAsset { asset: AssetId },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("malformed trigger: {0}")]
    MalformedTrigger(String),

    #[error("donations are only accepted from the notifier, not {sender}")]
    UnauthorizedNotifier { sender: String },

    #[error("converted amount does not fit the supply counter")]
    ConversionOverflow,

    #[error("invalid agent configuration: {0}")]
    InvalidConfig(String),

    #[error("stored state is inconsistent: {0}")]
    CorruptState(String),

    #[error("state storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AgentError {
    /// Stable machine-readable code reported in bounce responses.
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::AlreadyDefined => "already_defined",
            AgentError::NotDefined => "not_defined",
            AgentError::RateUnavailable { .. } => "rate_unavailable",
            AgentError::UnregisteredAsset { .. } => "unregistered_asset",
            AgentError::InvalidAmount(_) => "invalid_amount",
            AgentError::MalformedTrigger(_) => "malformed_trigger",
            AgentError::UnauthorizedNotifier { .. } => "unauthorized_notifier",
            AgentError::ConversionOverflow => "conversion_overflow",
            AgentError::InvalidConfig(_) => "invalid_config",
            AgentError::CorruptState(_) => "corrupt_state",
            AgentError::Storage(_) => "storage",
        }
    }
}

impl From<RegistryError> for AgentError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Unregistered { asset } => AgentError::UnregisteredAsset { asset },
            other => AgentError::MalformedTrigger(other.to_string()),
        }
    }
}

impl From<OracleError> for AgentError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::FeedMissing { feed }
            | OracleError::InvalidValue { feed, .. }
            | OracleError::InvalidFeedName { feed } => AgentError::RateUnavailable { feed },
            other @ OracleError::UnknownOracle { .. } => AgentError::RateUnavailable {
                feed: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
