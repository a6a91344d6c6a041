//! Rating agent
//!
//! Converts donations in the base asset or in registered secondary assets
//! into a single reputation unit, minted in proportion to the donation's
//! USD value and tracked per donor and per (project, donor):
//!
//! - `define` issues the reputation asset, exactly once
//! - donation notifications are valued through the token registry and the
//!   oracle feeds, then credited to `supply`, `rating*<donor>` and
//!   `rating*<project>*<donor>`, and paid out to the donor
//!
//! Any failure bounces the trigger without touching state.

pub mod agent;
pub mod config;
pub mod conversion;
pub mod errors;
pub mod issuance;
pub mod ledger;
pub mod rates;
pub mod request;

pub use agent::{Bounce, RatingAgent, TriggerOutcome};
pub use config::AgentConfig;
pub use conversion::{convert, UsdRates, Valuation};
pub use errors::{AgentError, Result};
pub use issuance::IssuanceState;
pub use ledger::DonationReceipt;
pub use rates::RateResolver;
pub use request::{parse_request, Donation, Request};
