//! Conversion of donated amounts into reputation units.
//!
//! The reputation unit has the base asset's precision, so base-asset
//! donations convert one to one. Secondary assets are valued through their
//! USD price relative to the base asset's USD price:
//!
//! `floor(raw / 10^decimals * asset_usd / base_usd * 10^BASE_DECIMALS)`
//!
//! evaluated exactly on big integers. Rounding is always toward zero.

use crate::errors::{AgentError, Result};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rating_types::{Amount, BASE_DECIMALS};
use rust_decimal::Decimal;

/// USD prices of a secondary asset and of the base asset. Both positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsdRates {
    asset_usd: Decimal,
    base_usd: Decimal,
}

impl UsdRates {
    /// `None` unless both rates are strictly positive.
    pub fn new(asset_usd: Decimal, base_usd: Decimal) -> Option<Self> {
        if asset_usd > Decimal::ZERO && base_usd > Decimal::ZERO {
            Some(Self {
                asset_usd,
                base_usd,
            })
        } else {
            None
        }
    }

    pub fn asset_usd(&self) -> Decimal {
        self.asset_usd
    }

    pub fn base_usd(&self) -> Decimal {
        self.base_usd
    }
}

/// How an inbound asset is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valuation {
    /// Base asset, minted one to one.
    Base,
    /// Secondary asset with its registered precision and current rates.
    Secondary { decimals: u32, rates: UsdRates },
}

/// Reputation units minted for `raw_amount`.
pub fn convert(raw_amount: Amount, valuation: &Valuation) -> Result<Amount> {
    if raw_amount == 0 {
        return Err(AgentError::InvalidAmount(
            "amount must be a positive integer".into(),
        ));
    }
    match valuation {
        Valuation::Base => Ok(raw_amount),
        Valuation::Secondary { decimals, rates } => {
            convert_secondary(raw_amount, *decimals, rates)
        }
    }
}

fn convert_secondary(raw_amount: Amount, decimals: u32, rates: &UsdRates) -> Result<Amount> {
    // rate = mantissa / 10^scale, mantissas are positive by construction
    let (asset_mantissa, asset_scale) = decimal_parts(rates.asset_usd)?;
    let (base_mantissa, base_scale) = decimal_parts(rates.base_usd)?;

    let numerator = BigUint::from(raw_amount)
        * asset_mantissa
        * pow10(base_scale + BASE_DECIMALS);
    let denominator = base_mantissa * pow10(decimals + asset_scale);

    (numerator / denominator)
        .to_u128()
        .ok_or(AgentError::ConversionOverflow)
}

fn decimal_parts(value: Decimal) -> Result<(BigUint, u32)> {
    let mantissa = u128::try_from(value.mantissa())
        .map_err(|_| AgentError::InvalidAmount(format!("negative rate {value}")))?;
    if mantissa.is_zero() {
        return Err(AgentError::InvalidAmount(format!("zero rate {value}")));
    }
    Ok((BigUint::from(mantissa), value.scale()))
}

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn rates(asset: &str, base: &str) -> UsdRates {
        UsdRates::new(
            Decimal::from_str(asset).unwrap(),
            Decimal::from_str(base).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn base_is_lossless() {
        assert_eq!(convert(1_000_000_000, &Valuation::Base).unwrap(), 1_000_000_000);
        assert_eq!(convert(1, &Valuation::Base).unwrap(), 1);
    }

    #[test]
    fn usdc_example() {
        // 10 USDC at $1 with GBYTE at $100 is 0.1 GBYTE
        let valuation = Valuation::Secondary {
            decimals: 4,
            rates: rates("1", "100"),
        };
        assert_eq!(convert(100_000, &valuation).unwrap(), 100_000_000);
    }

    #[test]
    fn eth_with_nine_decimals() {
        // 1 ETH at $1000 with GBYTE at $100 is 10 GBYTE
        let valuation = Valuation::Secondary {
            decimals: 9,
            rates: rates("1000", "100"),
        };
        assert_eq!(convert(1_000_000_000, &valuation).unwrap(), 10_000_000_000);
    }

    #[test]
    fn rounds_toward_zero() {
        // 1 unit of a 4-decimal $1 token at $3 per GBYTE = 33333.33.. bytes
        let valuation = Valuation::Secondary {
            decimals: 4,
            rates: rates("1", "3"),
        };
        assert_eq!(convert(1, &valuation).unwrap(), 33_333);
    }

    #[test]
    fn fractional_rates_are_exact() {
        // 2.5 units at $0.4 with GBYTE at $12.5
        let valuation = Valuation::Secondary {
            decimals: 1,
            rates: rates("0.4", "12.5"),
        };
        // 25 raw / 10 * 0.4 / 12.5 * 1e9 = 80_000_000
        assert_eq!(convert(25, &valuation).unwrap(), 80_000_000);
    }

    #[test]
    fn dust_converts_to_zero() {
        let valuation = Valuation::Secondary {
            decimals: 15,
            rates: rates("0.000001", "100"),
        };
        assert_eq!(convert(1, &valuation).unwrap(), 0);
    }

    #[test]
    fn zero_amount_rejected() {
        assert!(matches!(
            convert(0, &Valuation::Base),
            Err(AgentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn overflow_is_reported() {
        let valuation = Valuation::Secondary {
            decimals: 0,
            rates: rates("1000000000000", "0.000000001"),
        };
        assert!(matches!(
            convert(u128::MAX, &valuation),
            Err(AgentError::ConversionOverflow)
        ));
    }

    #[test]
    fn non_positive_rates_rejected() {
        assert!(UsdRates::new(Decimal::ZERO, Decimal::ONE).is_none());
        assert!(UsdRates::new(Decimal::ONE, Decimal::NEGATIVE_ONE).is_none());
    }
}
