use std::fmt;
use std::str::FromStr;

use crate::error::DataContractViolation;

/// A 20-byte Ethereum address. The indexer lowercases addresses while configuration usually
/// carries the checksummed form, so comparison happens on the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl FromStr for Address {
    type Err = DataContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataContractViolation::InvalidAddress(s.to_string());

        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if digits.len() != 40 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
