use crate::errors::*;
use crate::types::*;
use parking_lot::RwLock;
use rating_types::Address;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Source of the latest feed values.
pub trait PriceOracle: Send + Sync {
    /// Most recent value posted for `feed` by one of `oracles`. An empty set
    /// leaves the choice to the source.
    fn latest_from(&self, feed: &str, oracles: &BTreeSet<Address>) -> Result<FeedValue>;

    /// Most recent value posted for `feed` by any honoured oracle.
    fn latest(&self, feed: &str) -> Result<FeedValue> {
        self.latest_from(feed, &BTreeSet::new())
    }
}

/// Data feeds posted by oracles, newest value per (oracle, feed).
#[derive(Debug, Clone, Default)]
pub struct DataFeedStore {
    feeds: Arc<RwLock<BTreeMap<(Address, String), FeedValue>>>,
    /// Oracles whose posts are accepted. Empty accepts any poster.
    oracles: BTreeSet<Address>,
}

impl DataFeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept posts from `oracles`.
    pub fn with_oracles(oracles: impl IntoIterator<Item = Address>) -> Self {
        Self {
            feeds: Arc::default(),
            oracles: oracles.into_iter().collect(),
        }
    }

    fn honours(&self, oracle: &Address) -> bool {
        self.oracles.is_empty() || self.oracles.contains(oracle)
    }

    /// Record a data feed message. The whole payload is validated before
    /// anything is stored. Values older than what the oracle already posted
    /// for a feed are skipped. Returns how many feeds were updated.
    pub fn post(
        &self,
        oracle: &Address,
        payload: BTreeMap<String, Decimal>,
        posted_at: u64,
    ) -> Result<usize> {
        if !self.honours(oracle) {
            return Err(OracleError::UnknownOracle {
                oracle: oracle.to_string(),
            });
        }
        for (feed, value) in &payload {
            if !is_valid_feed_name(feed) {
                return Err(OracleError::InvalidFeedName { feed: feed.clone() });
            }
            if *value <= Decimal::ZERO {
                return Err(OracleError::InvalidValue {
                    feed: feed.clone(),
                    value: value.to_string(),
                });
            }
        }

        let mut feeds = self.feeds.write();
        let mut updated = 0;
        for (feed, value) in payload {
            let key = (oracle.clone(), feed);
            if let Some(existing) = feeds.get(&key) {
                if existing.posted_at > posted_at {
                    debug!(
                        target: "oracle",
                        "Skipping stale {} from {} (posted_at {} < {})",
                        key.1,
                        oracle,
                        posted_at,
                        existing.posted_at
                    );
                    continue;
                }
            }
            feeds.insert(
                key,
                FeedValue {
                    value,
                    posted_at,
                    oracle: oracle.clone(),
                },
            );
            updated += 1;
        }

        info!(target: "oracle", "{} posted {} feed values", oracle, updated);
        Ok(updated)
    }
}

impl PriceOracle for DataFeedStore {
    fn latest_from(&self, feed: &str, oracles: &BTreeSet<Address>) -> Result<FeedValue> {
        let feeds = self.feeds.read();
        let mut best: Option<&FeedValue> = None;
        for ((oracle, name), value) in feeds.iter() {
            if name != feed || !self.honours(oracle) {
                continue;
            }
            if !oracles.is_empty() && !oracles.contains(oracle) {
                continue;
            }
            // ties keep the first oracle in address order
            if best.map_or(true, |b| value.posted_at > b.posted_at) {
                best = Some(value);
            }
        }
        best.cloned().ok_or_else(|| OracleError::FeedMissing {
            feed: feed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn oracle(name: &str) -> Address {
        Address::new(name).unwrap()
    }

    fn payload(entries: &[(&str, i64)]) -> BTreeMap<String, Decimal> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Decimal::from(*v)))
            .collect()
    }

    #[test]
    fn latest_returns_posted_value() {
        let store = DataFeedStore::new();
        let updated = store
            .post(&oracle("ORACLE"), payload(&[("GBYTE_USD", 100), ("USDC_USD", 1)]), 1)
            .unwrap();
        assert_eq!(updated, 2);
        assert_eq!(store.latest("GBYTE_USD").unwrap().value, Decimal::from(100));
        assert_eq!(
            store.latest("ETH_USD"),
            Err(OracleError::FeedMissing {
                feed: "ETH_USD".into()
            })
        );
    }

    #[test]
    fn newer_post_wins_across_oracles() {
        let store = DataFeedStore::new();
        store.post(&oracle("A"), payload(&[("GBYTE_USD", 100)]), 5).unwrap();
        store.post(&oracle("B"), payload(&[("GBYTE_USD", 120)]), 7).unwrap();
        assert_eq!(store.latest("GBYTE_USD").unwrap().value, Decimal::from(120));

        // older post from A is ignored
        assert_eq!(store.post(&oracle("A"), payload(&[("GBYTE_USD", 1)]), 4).unwrap(), 0);
        assert_eq!(store.latest("GBYTE_USD").unwrap().oracle, oracle("B"));
    }

    #[test]
    fn rejects_bad_payloads_atomically() {
        let store = DataFeedStore::new();
        let mut bad = payload(&[("GBYTE_USD", 100)]);
        bad.insert("USDC_USD".into(), Decimal::ZERO);
        assert!(matches!(
            store.post(&oracle("A"), bad, 1),
            Err(OracleError::InvalidValue { .. })
        ));
        assert!(store.latest("GBYTE_USD").is_err());

        assert!(matches!(
            store.post(&oracle("A"), payload(&[("gbyte", 1)]), 1),
            Err(OracleError::InvalidFeedName { .. })
        ));
    }

    #[test]
    fn only_honoured_oracles_may_post() {
        let store = DataFeedStore::with_oracles([oracle("TRUSTED")]);
        assert!(matches!(
            store.post(&oracle("ROGUE"), payload(&[("GBYTE_USD", 1)]), 1),
            Err(OracleError::UnknownOracle { .. })
        ));
        store.post(&oracle("TRUSTED"), payload(&[("GBYTE_USD", 99)]), 1).unwrap();
        assert_eq!(store.latest("GBYTE_USD").unwrap().value, Decimal::from(99));
    }

    #[test]
    fn latest_from_skips_oracles_outside_the_set() {
        let store = DataFeedStore::new();
        store.post(&oracle("TRUSTED"), payload(&[("GBYTE_USD", 20)]), 3).unwrap();
        store.post(&oracle("ROGUE"), payload(&[("GBYTE_USD", 1), ("USDC_USD", 1000)]), 9).unwrap();

        let trusted = BTreeSet::from([oracle("TRUSTED")]);
        let value = store.latest_from("GBYTE_USD", &trusted).unwrap();
        assert_eq!(value.value, Decimal::from(20));
        assert_eq!(value.oracle, oracle("TRUSTED"));
        assert!(matches!(
            store.latest_from("USDC_USD", &trusted),
            Err(OracleError::FeedMissing { .. })
        ));
        assert_eq!(store.latest("USDC_USD").unwrap().value, Decimal::from(1000));
    }
}
