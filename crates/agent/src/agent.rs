//! Trigger execution for one agent instance.
//!
//! Triggers run one at a time under `exec_lock`. Each runs against a fresh
//! [`StateBatch`]; the batch is committed only if the whole operation
//! succeeded, so a bounced trigger leaves no trace in state.

use crate::config::AgentConfig;
use crate::errors::{AgentError, Result};
use crate::issuance::{self, IssuanceState};
use crate::ledger::{self, DonationReceipt};
use crate::rates::RateResolver;
use crate::request::{parse_request, Donation, Request};
use parking_lot::Mutex;
use rating_oracle::PriceOracle;
use rating_registry::TokenRegistry;
use rating_storage::{StateBatch, StateStore, StateValue};
use rating_types::{
    amount_to_json, donor_rating_key, project_rating_key, AaResponse, Address, Amount, AssetId,
    AssetRef, Payment, ProjectId, Trigger, ASSET_KEY, SUPPLY_KEY,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Rejected trigger: why, and the value returned to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bounce {
    pub code: String,
    pub error: String,
    pub refunds: Vec<Payment>,
}

/// Result of handling a trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Committed(AaResponse),
    Bounced(Bounce),
}

impl TriggerOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, TriggerOutcome::Committed(_))
    }

    pub fn response(&self) -> Option<&AaResponse> {
        match self {
            TriggerOutcome::Committed(response) => Some(response),
            TriggerOutcome::Bounced(_) => None,
        }
    }

    pub fn bounce(&self) -> Option<&Bounce> {
        match self {
            TriggerOutcome::Committed(_) => None,
            TriggerOutcome::Bounced(bounce) => Some(bounce),
        }
    }
}

pub struct RatingAgent<S: StateStore> {
    store: S,
    resolver: RateResolver,
    config: AgentConfig,
    exec_lock: Mutex<()>,
}

impl<S: StateStore> RatingAgent<S> {
    pub fn new(
        store: S,
        registry: Arc<dyn TokenRegistry>,
        oracle: Arc<dyn PriceOracle>,
        config: AgentConfig,
    ) -> Result<Self> {
        config.validate()?;
        let resolver = RateResolver::new(
            registry,
            oracle,
            config.base_symbol.clone(),
            config.quote_symbol.clone(),
        )
        .with_oracles(config.oracles.iter().cloned());
        Ok(Self {
            store,
            resolver,
            config,
            exec_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one inbound trigger to completion.
    pub fn handle(&self, trigger: &Trigger) -> TriggerOutcome {
        match self.apply(trigger) {
            Ok(response) => TriggerOutcome::Committed(response),
            Err(err) => {
                warn!(
                    target: "agent",
                    "Bouncing trigger {} from {}: {}",
                    trigger.unit,
                    trigger.sender,
                    err
                );
                TriggerOutcome::Bounced(self.bounce(trigger, &err))
            }
        }
    }

    fn apply(&self, trigger: &Trigger) -> Result<AaResponse> {
        match parse_request(trigger)? {
            Request::Define => {
                let asset = self.define(&trigger.unit)?;
                let mut response_vars = BTreeMap::new();
                response_vars.insert(
                    ASSET_KEY.to_string(),
                    serde_json::Value::String(asset.to_string()),
                );
                Ok(AaResponse {
                    response_vars,
                    payments: Vec::new(),
                })
            }
            Request::Donate(donation) => {
                self.check_notifier(&trigger.sender)?;
                let receipt = self.donate(&donation)?;
                let mut response_vars = BTreeMap::new();
                response_vars.insert("minted".to_string(), amount_to_json(receipt.minted));
                Ok(AaResponse {
                    response_vars,
                    payments: receipt.payment().into_iter().collect(),
                })
            }
        }
    }

    fn check_notifier(&self, sender: &Address) -> Result<()> {
        match &self.config.trusted_notifier {
            Some(notifier) if notifier != sender => Err(AgentError::UnauthorizedNotifier {
                sender: sender.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Return attached value to the sender, less the bounce fee on the base asset.
    fn bounce(&self, trigger: &Trigger, err: &AgentError) -> Bounce {
        let refunds = trigger
            .payments
            .iter()
            .filter_map(|(asset, amount)| {
                let amount = match asset {
                    AssetRef::Base => amount.saturating_sub(Amount::from(self.config.bounce_fee)),
                    AssetRef::Asset(_) => *amount,
                };
                (amount > 0).then(|| Payment {
                    address: trigger.sender.clone(),
                    asset: asset.clone(),
                    amount,
                })
            })
            .collect();
        Bounce {
            code: err.code().to_string(),
            error: err.to_string(),
            refunds,
        }
    }

    /// Run `op` as one indivisible step: serialized with every other
    /// operation on this agent, committed only on success.
    fn execute<T>(&self, op: impl FnOnce(&mut StateBatch<'_>) -> Result<T>) -> Result<T> {
        let _guard = self.exec_lock.lock();
        let mut batch = StateBatch::new(&self.store);
        let out = op(&mut batch)?;
        self.store.commit(batch.into_writes())?;
        Ok(out)
    }

    /// Issue the reputation asset. Allowed once per agent lifetime.
    pub fn define(&self, trigger_unit: &str) -> Result<AssetId> {
        let agent_address = self.config.agent_address.as_str();
        self.execute(|batch| issuance::define(batch, agent_address, trigger_unit))
    }

    /// Record a donation and mint reputation to the donor.
    pub fn record_donation(
        &self,
        project: ProjectId,
        donor: Address,
        raw_amount: Amount,
        asset: AssetRef,
    ) -> Result<DonationReceipt> {
        self.donate(&Donation {
            project,
            donor,
            raw_amount,
            asset,
        })
    }

    fn donate(&self, donation: &Donation) -> Result<DonationReceipt> {
        let receipt = self.execute(|batch| ledger::record_donation(batch, &self.resolver, donation))?;
        if let Some(payment) = receipt.payment() {
            info!(
                target: "agent",
                "Paying {} of {} to {}",
                payment.amount,
                payment.asset,
                payment.address
            );
        }
        Ok(receipt)
    }

    pub fn issuance_state(&self) -> Result<IssuanceState> {
        issuance::parse_state(self.store.get_text(ASSET_KEY)?)
    }

    pub fn asset(&self) -> Result<Option<AssetId>> {
        Ok(self.issuance_state()?.asset().cloned())
    }

    pub fn supply(&self) -> Result<Amount> {
        Ok(self.store.get_number(SUPPLY_KEY)?)
    }

    pub fn rating(&self, donor: &Address) -> Result<Amount> {
        Ok(self.store.get_number(&donor_rating_key(donor))?)
    }

    pub fn project_rating(&self, project: &ProjectId, donor: &Address) -> Result<Amount> {
        Ok(self.store.get_number(&project_rating_key(project, donor))?)
    }

    /// All state vars as plain JSON values.
    pub fn state_vars(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        Ok(self
            .store
            .snapshot()?
            .iter()
            .map(|(key, value)| (key.clone(), StateValue::to_json(value)))
            .collect())
    }
}
