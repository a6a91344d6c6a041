use crate::errors::{AgentError, Result};
use rating_types::{Address, BASE_SYMBOL};
use serde::{Deserialize, Serialize};

const DEFAULT_AGENT_ADDRESS: &str = "RATING_AGENT";
const DEFAULT_QUOTE_SYMBOL: &str = "USD";
/// Base units kept by the host when it bounces a trigger.
const DEFAULT_BOUNCE_FEE: u64 = 10_000;

/// Runtime settings of a rating agent instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Address the agent runs at; seeds the reputation asset id.
    pub agent_address: String,
    /// Oracle symbol of the base asset.
    pub base_symbol: String,
    /// Quote currency of all feeds.
    pub quote_symbol: String,
    /// Base units withheld from the base-asset refund of a bounced trigger.
    pub bounce_fee: u64,
    /// When set, donation notifications from any other sender bounce.
    pub trusted_notifier: Option<Address>,
    /// Oracles whose data feeds are honoured. Empty honours any poster.
    pub oracles: Vec<Address>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_address: DEFAULT_AGENT_ADDRESS.to_string(),
            base_symbol: BASE_SYMBOL.to_string(),
            quote_symbol: DEFAULT_QUOTE_SYMBOL.to_string(),
            bounce_fee: DEFAULT_BOUNCE_FEE,
            trusted_notifier: None,
            oracles: Vec::new(),
        }
    }
}

fn is_symbol(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        Address::new(self.agent_address.as_str())
            .map_err(|e| AgentError::InvalidConfig(format!("agent_address: {e}")))?;
        if !is_symbol(&self.base_symbol) {
            return Err(AgentError::InvalidConfig(format!(
                "base_symbol {:?} must be upper-case alphanumeric",
                self.base_symbol
            )));
        }
        if !is_symbol(&self.quote_symbol) {
            return Err(AgentError::InvalidConfig(format!(
                "quote_symbol {:?} must be upper-case alphanumeric",
                self.quote_symbol
            )));
        }
        Ok(())
    }
}
