//! Inbound triggers and the responses produced for them.

use crate::{Address, Amount, AssetRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An inbound message addressed to the agent, with the value it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Unit (transaction) id that carried the trigger.
    pub unit: String,
    /// Author of the triggering unit.
    pub sender: Address,
    /// Value sent to the agent, per asset.
    #[serde(default)]
    pub payments: BTreeMap<AssetRef, Amount>,
    /// Data message attached to the unit.
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Trigger {
    pub fn new(unit: impl Into<String>, sender: Address) -> Self {
        Self {
            unit: unit.into(),
            sender,
            payments: BTreeMap::new(),
            data: serde_json::Map::new(),
        }
    }

    /// Attach value in `asset`. Totals saturate at `Amount::MAX`.
    pub fn with_payment(mut self, asset: AssetRef, amount: Amount) -> Self {
        let total = self.payments.entry(asset).or_insert(0);
        *total = total.saturating_add(amount);
        self
    }

    /// Replace the data message. Non-object values leave the data empty.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = match data {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        self
    }
}

/// Outbound transfer emitted by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub address: Address,
    pub asset: AssetRef,
    pub amount: Amount,
}

/// Effects of a committed trigger visible outside the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AaResponse {
    pub response_vars: BTreeMap<String, serde_json::Value>,
    pub payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trigger_decodes_from_json() {
        let trigger: Trigger = serde_json::from_value(json!({
            "unit": "u1",
            "sender": "ALICE",
            "payments": { "base": 10000 },
            "data": { "define": 1 }
        }))
        .unwrap();
        assert_eq!(trigger.payments.get(&AssetRef::Base), Some(&10_000));
        assert_eq!(trigger.data.get("define"), Some(&json!(1)));
    }

    #[test]
    fn payments_accumulate_per_asset() {
        let trigger = Trigger::new("u2", Address::new("BOB").unwrap())
            .with_payment(AssetRef::Base, 5)
            .with_payment(AssetRef::Base, 7);
        assert_eq!(trigger.payments[&AssetRef::Base], 12);
    }

    #[test]
    fn payment_totals_saturate() {
        let trigger = Trigger::new("u3", Address::new("BOB").unwrap())
            .with_payment(AssetRef::Base, Amount::MAX)
            .with_payment(AssetRef::Base, 1);
        assert_eq!(trigger.payments[&AssetRef::Base], Amount::MAX);
    }
}
