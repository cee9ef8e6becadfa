#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Usage: deposit-status <deposits.json>")]
    MissingArgument,

    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("System clock is before the Unix epoch: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    #[error("Data contract violation: {0}")]
    DataContract(#[from] DataContractViolation),
}

/// Indexer data that breaks an invariant of the deposit record. These point at a bug
/// upstream or an unhandled protocol upgrade and are never papered over with defaults.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DataContractViolation {
    #[error("Unrecognized deposit state {0:?}")]
    UnknownState(String),

    #[error("Field {field} is negative: {value}")]
    NegativeAmount { field: &'static str, value: String },

    #[error("Field {field} is not a valid number: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field {field} is out of range: {value}")]
    AmountOutOfRange { field: &'static str, value: String },

    #[error("Invalid address {0:?}")]
    InvalidAddress(String),

    #[error("Honest threshold {threshold} exceeds member count {members}")]
    HonestThresholdExceedsMembers { threshold: u32, members: usize },

    #[error("Cannot express {numerator} as a percentage of zero")]
    ZeroDenominator { numerator: u64 },
}
