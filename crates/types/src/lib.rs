//! Shared types for the rating agent workspace.
//!
//! Identifiers (donor addresses, project ids, asset ids), the integer
//! amount type, base-asset constants, the persisted state-key layout and
//! the shapes of inbound triggers and outbound responses.

pub mod address;
pub mod amount;
pub mod asset;
pub mod state_keys;
pub mod trigger;

pub use address::*;
pub use amount::*;
pub use asset::*;
pub use state_keys::*;
pub use trigger::*;
