use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::DataContractViolation;

/// A numeric indexer column. `Int` columns arrive as JSON numbers, `BigInt` columns as decimal
/// strings; both are accepted for every field so a schema change on either side doesn't break
/// decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl NumericField {
    pub fn to_u32(&self, field: &'static str) -> Result<u32, DataContractViolation> {
        let value = self.to_u128(field)?;
        u32::try_from(value).map_err(|_| DataContractViolation::AmountOutOfRange {
            field,
            value: value.to_string(),
        })
    }

    pub fn to_u64(&self, field: &'static str) -> Result<u64, DataContractViolation> {
        let value = self.to_u128(field)?;
        u64::try_from(value).map_err(|_| DataContractViolation::AmountOutOfRange {
            field,
            value: value.to_string(),
        })
    }

    pub fn to_u128(&self, field: &'static str) -> Result<u128, DataContractViolation> {
        let value = self.to_i128(field)?;
        u128::try_from(value).map_err(|_| DataContractViolation::NegativeAmount {
            field,
            value: value.to_string(),
        })
    }

    /// Non-negative decimal, for values that may legitimately carry a fraction.
    pub fn to_decimal(&self, field: &'static str) -> Result<Decimal, DataContractViolation> {
        let value = match self {
            NumericField::Integer(n) => Decimal::from(*n),
            NumericField::Unsigned(n) => Decimal::from(*n),
            NumericField::Float(f) => {
                Decimal::try_from(*f).map_err(|_| self.invalid(field))?
            }
            NumericField::Text(s) => Decimal::from_str(s.trim()).map_err(|_| self.invalid(field))?,
        };

        if value < Decimal::ZERO {
            return Err(DataContractViolation::NegativeAmount {
                field,
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    fn to_i128(&self, field: &'static str) -> Result<i128, DataContractViolation> {
        match self {
            NumericField::Integer(n) => Ok(i128::from(*n)),
            NumericField::Unsigned(n) => Ok(i128::from(*n)),
            NumericField::Float(_) => Err(self.invalid(field)),
            NumericField::Text(s) => s.trim().parse::<i128>().map_err(|_| self.invalid(field)),
        }
    }

    fn invalid(&self, field: &'static str) -> DataContractViolation {
        let value = match self {
            NumericField::Integer(n) => n.to_string(),
            NumericField::Unsigned(n) => n.to_string(),
            NumericField::Float(f) => f.to_string(),
            NumericField::Text(s) => s.clone(),
        };
        DataContractViolation::InvalidNumber { field, value }
    }
}
