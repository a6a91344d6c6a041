//! Donation bookkeeping: supply, per-donor and per-project-donor ratings.

use crate::conversion::convert;
use crate::errors::{AgentError, Result};
use crate::issuance::{read_state, IssuanceState};
use crate::rates::RateResolver;
use crate::request::Donation;
use rating_storage::StateBatch;
use rating_types::{
    donor_rating_key, project_rating_key, Address, Amount, AssetId, AssetRef, Payment, ProjectId,
    SUPPLY_KEY,
};
use serde::Serialize;
use tracing::{debug, info};

/// Result of one recorded donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationReceipt {
    pub project: ProjectId,
    pub donor: Address,
    pub donated_asset: AssetRef,
    pub raw_amount: Amount,
    /// Reputation units minted for this donation.
    pub minted: Amount,
    pub rating_asset: AssetId,
    /// Counters after the update.
    pub supply: Amount,
    pub donor_rating: Amount,
    pub project_rating: Amount,
}

impl DonationReceipt {
    /// Outbound transfer of the minted units; none for dust donations.
    pub fn payment(&self) -> Option<Payment> {
        (self.minted > 0).then(|| Payment {
            address: self.donor.clone(),
            asset: AssetRef::Asset(self.rating_asset.clone()),
            amount: self.minted,
        })
    }
}

/// Value a donation and add the minted amount to all three counters.
///
/// Writes only into `batch`; the caller commits it together with the payout.
pub fn record_donation(
    batch: &mut StateBatch<'_>,
    resolver: &RateResolver,
    donation: &Donation,
) -> Result<DonationReceipt> {
    let rating_asset = match read_state(batch)? {
        IssuanceState::Undefined => return Err(AgentError::NotDefined),
        IssuanceState::Defined(asset) => asset,
    };
    if donation.raw_amount == 0 {
        return Err(AgentError::InvalidAmount(
            "amount must be a positive integer".into(),
        ));
    }

    let valuation = resolver.valuation(&donation.asset)?;
    let minted = convert(donation.raw_amount, &valuation)?;
    debug!(
        target: "donation",
        "{} {} valued as {:?} -> {} minted",
        donation.raw_amount,
        donation.asset,
        valuation,
        minted
    );

    // supply bounds every rating, so once it fits the others do too
    let supply = batch.add_number(SUPPLY_KEY, minted)?;
    let donor_rating = batch.add_number(&donor_rating_key(&donation.donor), minted)?;
    let project_rating = batch.add_number(
        &project_rating_key(&donation.project, &donation.donor),
        minted,
    )?;

    info!(
        target: "donation",
        "{} donated {} {} to {}: minted {}, rating {}",
        donation.donor,
        donation.raw_amount,
        donation.asset,
        donation.project,
        minted,
        donor_rating
    );

    Ok(DonationReceipt {
        project: donation.project.clone(),
        donor: donation.donor.clone(),
        donated_asset: donation.asset.clone(),
        raw_amount: donation.raw_amount,
        minted,
        rating_asset,
        supply,
        donor_rating,
        project_rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::define;
    use rating_oracle::DataFeedStore;
    use rating_registry::InMemoryTokenRegistry;
    use rating_storage::{MemoryStateStore, StateStore};
    use std::sync::Arc;

    fn resolver() -> RateResolver {
        RateResolver::new(
            Arc::new(InMemoryTokenRegistry::new()),
            Arc::new(DataFeedStore::new()),
            "GBYTE",
            "USD",
        )
    }

    fn donation(project: &str, donor: &str, raw_amount: Amount) -> Donation {
        Donation {
            project: ProjectId::new(project).unwrap(),
            donor: Address::new(donor).unwrap(),
            raw_amount,
            asset: AssetRef::Base,
        }
    }

    #[test]
    fn requires_definition() {
        let store = MemoryStateStore::new();
        let mut batch = StateBatch::new(&store);
        assert!(matches!(
            record_donation(&mut batch, &resolver(), &donation("p", "D", 10)),
            Err(AgentError::NotDefined)
        ));
        assert!(batch.is_empty());
    }

    #[test]
    fn increments_all_counters() {
        let store = MemoryStateStore::new();
        let resolver = resolver();
        let mut batch = StateBatch::new(&store);
        let asset = define(&mut batch, "AGENT", "u0").unwrap();

        let first = record_donation(&mut batch, &resolver, &donation("p1", "D", 300)).unwrap();
        let second = record_donation(&mut batch, &resolver, &donation("p2", "D", 200)).unwrap();
        store.commit(batch.into_writes()).unwrap();

        assert_eq!(first.minted, 300);
        assert_eq!(second.supply, 500);
        assert_eq!(second.donor_rating, 500);
        assert_eq!(second.project_rating, 200);
        assert_eq!(store.get_number("rating*p1*D").unwrap(), 300);
        assert_eq!(store.get_number("rating*D").unwrap(), 500);
        assert_eq!(
            second.payment(),
            Some(Payment {
                address: Address::new("D").unwrap(),
                asset: AssetRef::Asset(asset),
                amount: 200,
            })
        );
    }
}
