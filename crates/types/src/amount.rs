//! Integer amounts and base-asset constants.
//!
//! All balances and counters are kept in minimal units of the asset they
//! denominate. The reputation unit shares the base asset's granularity.

/// Amount in minimal units.
pub type Amount = u128;

/// Decimal precision of the base settlement asset (1 GBYTE = 10^9 bytes).
pub const BASE_DECIMALS: u32 = 9;

/// Oracle symbol of the base settlement asset.
pub const BASE_SYMBOL: &str = "GBYTE";

/// Render an amount as JSON, falling back to a decimal string when it does
/// not fit a JSON integer.
pub fn amount_to_json(amount: Amount) -> serde_json::Value {
    match u64::try_from(amount) {
        Ok(small) => serde_json::Value::from(small),
        Err(_) => serde_json::Value::String(amount.to_string()),
    }
}
