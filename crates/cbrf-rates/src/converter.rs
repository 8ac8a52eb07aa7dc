//! Point-in-time currency conversion.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{RatesError, Result};
use crate::models::RateTable;

/// Decimal places used when the caller has no preference.
pub const DEFAULT_PRECISION: u32 = 2;

/// Converts amounts through the provider's home currency.
///
/// Every feed rate is quoted in the home currency, so a conversion is
/// `amount * rate(from) / rate(to)`. Home currency codes never appear in a
/// feed and are given a rate of exactly one.
#[derive(Clone, Debug)]
pub struct Converter {
    home_currencies: Vec<String>,
}

impl Converter {
    pub fn new(home_currencies: Vec<String>) -> Self {
        Self {
            home_currencies: home_currencies
                .into_iter()
                .map(|code| code.trim().to_uppercase())
                .collect(),
        }
    }

    pub fn is_home_currency(&self, code: &str) -> bool {
        let code = code.trim();
        self.home_currencies
            .iter()
            .any(|home| home.eq_ignore_ascii_case(code))
    }

    /// Unit rate of `code` in the home currency.
    pub fn rate_of(&self, table: &RateTable, code: &str) -> Result<Decimal> {
        if self.is_home_currency(code) {
            return Ok(Decimal::ONE);
        }
        match table.get(code).map(|rate| rate.value()) {
            Some(rate) if !rate.is_zero() => Ok(rate),
            Some(_) => Err(RatesError::MissingRate(format!(
                "Rate for {} is zero",
                code.trim().to_uppercase()
            ))),
            None => Err(RatesError::MissingRate(format!(
                "No rate for {}",
                code.trim().to_uppercase()
            ))),
        }
    }

    /// Convert `amount` of `from` into `to`, rounded half away from zero to
    /// `precision` decimal places.
    pub fn convert(
        &self,
        table: &RateTable,
        from: &str,
        to: &str,
        amount: Decimal,
        precision: u32,
    ) -> Result<Decimal> {
        let from_rate = self.rate_of(table, from)?;
        let to_rate = self.rate_of(table, to)?;

        let converted = amount
            .checked_mul(from_rate)
            .and_then(|value| value.checked_div(to_rate))
            .ok_or_else(|| {
                RatesError::InvalidQuery(format!(
                    "Converting {} {} to {} overflows",
                    amount, from, to
                ))
            })?;

        let mut rounded =
            converted.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(precision);
        Ok(rounded)
    }
}
