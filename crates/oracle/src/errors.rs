use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("no value posted for feed {feed}")]
    FeedMissing { feed: String },

    #[error("feed {feed} has non-positive value {value}")]
    InvalidValue { feed: String, value: String },

    #[error("invalid feed name: {feed}")]
    InvalidFeedName { feed: String },

    #[error("address {oracle} is not an honoured oracle")]
    UnknownOracle { oracle: String },
}

pub type Result<T> = std::result::Result<T, OracleError>;
