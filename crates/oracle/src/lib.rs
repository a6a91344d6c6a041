//! Oracle data feeds
//!
//! Oracles post named numeric feeds (`GBYTE_USD`, `USDC_USD`, ...). The
//! rating agent always reads the latest posted value; there is no caching
//! and no staleness bound.

pub mod errors;
pub mod feed;
pub mod types;

pub use errors::*;
pub use feed::{DataFeedStore, PriceOracle};
pub use types::*;
