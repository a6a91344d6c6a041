//! Token registry for secondary assets
//!
//! Maps a secondary asset id to its human symbol and decimal precision.
//! The rating agent consults it to learn how many digits an inbound
//! amount carries and which oracle feed prices the asset.

pub mod errors;
pub mod registry;
pub mod types;

pub use errors::*;
pub use registry::{InMemoryTokenRegistry, TokenRegistry};
pub use types::*;
