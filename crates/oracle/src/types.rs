use rating_types::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A posted feed value and when it was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedValue {
    pub value: Decimal,
    /// Posting time in seconds (or main chain index), monotone per oracle.
    pub posted_at: u64,
    pub oracle: Address,
}

/// Feed name for a symbol priced in `quote`, e.g. `USDC_USD`.
pub fn feed_name(symbol: &str, quote: &str) -> String {
    format!("{symbol}_{quote}")
}

/// Feed names use upper-case ASCII letters, digits and `_`.
pub fn is_valid_feed_name(feed: &str) -> bool {
    !feed.is_empty()
        && feed
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_names() {
        assert_eq!(feed_name("GBYTE", "USD"), "GBYTE_USD");
        assert!(is_valid_feed_name("USDC_USD"));
        assert!(!is_valid_feed_name("usdc_usd"));
        assert!(!is_valid_feed_name(""));
    }
}
