pub mod config;
pub mod deposit;
pub mod error;
pub mod format;
pub mod links;
pub mod snapshot;
pub mod status;

pub use deposit::{Deposit, DepositRow, DepositState};
pub use error::{DataContractViolation, Error};
pub use status::{CollateralizationStatus, StatusResolver};
