use std::str::FromStr;

use chrono::DateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::DataContractViolation;

pub const SATOSHIS_PER_BITCOIN: u64 = 100_000_000;
const BITCOIN_DECIMALS: u32 = 8;
const ETHER_DECIMALS: u32 = 18;

// Display precision. Percentages keep at most this many fraction digits, bitcoin and ether
// amounts at least this many.
const DISPLAY_DP: u32 = 2;

/// Exact satoshi to bitcoin conversion. Shows at least two fraction digits but never drops a
/// significant satoshi: 100000000 is "1.00", 100000 is "0.001".
pub fn satoshis_to_bitcoin(satoshis: u64) -> String {
    let bitcoin = Decimal::from_i128_with_scale(i128::from(satoshis), BITCOIN_DECIMALS);
    with_min_scale(bitcoin, DISPLAY_DP).to_string()
}

/// Inverse of [`satoshis_to_bitcoin`]. Rejects negatives and sub-satoshi precision.
pub fn bitcoin_to_satoshis(bitcoin: &str) -> Result<u64, DataContractViolation> {
    let invalid = || DataContractViolation::InvalidNumber {
        field: "bitcoin",
        value: bitcoin.to_string(),
    };

    let amount = Decimal::from_str(bitcoin.trim()).map_err(|_| invalid())?;
    if amount < Decimal::ZERO {
        return Err(DataContractViolation::NegativeAmount {
            field: "bitcoin",
            value: bitcoin.to_string(),
        });
    }

    let satoshis = amount
        .checked_mul(Decimal::from(SATOSHIS_PER_BITCOIN))
        .ok_or_else(|| DataContractViolation::AmountOutOfRange {
            field: "bitcoin",
            value: bitcoin.to_string(),
        })?;
    if !satoshis.fract().is_zero() {
        return Err(invalid());
    }

    satoshis
        .to_u64()
        .ok_or_else(|| DataContractViolation::AmountOutOfRange {
            field: "bitcoin",
            value: bitcoin.to_string(),
        })
}

/// Exact wei to ether conversion.
pub fn wei_to_eth(wei: u128) -> Result<Decimal, DataContractViolation> {
    let out_of_range = || DataContractViolation::AmountOutOfRange {
        field: "wei",
        value: wei.to_string(),
    };

    let wei = i128::try_from(wei).map_err(|_| out_of_range())?;
    Decimal::try_from_i128_with_scale(wei, ETHER_DECIMALS)
        .map(|eth| eth.normalize())
        .map_err(|_| out_of_range())
}

/// Ether amount for display, rounded to two places only at this last step.
pub fn format_eth(wei: u128) -> Result<String, DataContractViolation> {
    let eth = wei_to_eth(wei)?
        .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero);
    Ok(format!("{:.2}", eth))
}

/// `numerator / denominator` as a percentage with at most two fraction digits, e.g. 3 of 5 is
/// "60%" and 2 of 3 is "66.67%".
pub fn format_percent(numerator: u64, denominator: u64) -> Result<String, DataContractViolation> {
    if denominator == 0 {
        return Err(DataContractViolation::ZeroDenominator { numerator });
    }

    let ratio = Decimal::from(numerator)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::from(denominator)))
        .ok_or_else(|| DataContractViolation::AmountOutOfRange {
            field: "percent",
            value: format!("{numerator}/{denominator}"),
        })?;

    let percent = ratio
        .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    Ok(format!("{}%", percent))
}

/// A threshold stored as a whole percent (150 = 150%).
pub fn format_threshold(percent: u32) -> String {
    format!("{}%", percent)
}

/// Seconds since the epoch as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(seconds: u64) -> Result<String, DataContractViolation> {
    let out_of_range = || DataContractViolation::AmountOutOfRange {
        field: "timestamp",
        value: seconds.to_string(),
    };

    let seconds = i64::try_from(seconds).map_err(|_| out_of_range())?;
    let time = DateTime::from_timestamp(seconds, 0).ok_or_else(out_of_range)?;
    Ok(time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn with_min_scale(value: Decimal, min_scale: u32) -> Decimal {
    let mut value = value.normalize();
    if value.scale() < min_scale {
        value.rescale(min_scale);
    }
    value
}
