use std::fmt;
use std::str::FromStr;

use crate::error::DataContractViolation;

/// Lifecycle states of a deposit contract, as reported verbatim by the indexer.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DepositState {
    Start,
    AwaitingSignerSetup,
    AwaitingBtcFundingProof,
    FailedSetup,
    Active,
    AwaitingWithdrawalSignature,
    AwaitingWithdrawalProof,
    Redeemed,
    CourtesyCall,
    FraudLiquidationInProgress,
    LiquidationInProgress,
    Liquidated,
}

impl DepositState {
    pub const ALL: [DepositState; 12] = [
        DepositState::Start,
        DepositState::AwaitingSignerSetup,
        DepositState::AwaitingBtcFundingProof,
        DepositState::FailedSetup,
        DepositState::Active,
        DepositState::AwaitingWithdrawalSignature,
        DepositState::AwaitingWithdrawalProof,
        DepositState::Redeemed,
        DepositState::CourtesyCall,
        DepositState::FraudLiquidationInProgress,
        DepositState::LiquidationInProgress,
        DepositState::Liquidated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepositState::Start => "START",
            DepositState::AwaitingSignerSetup => "AWAITING_SIGNER_SETUP",
            DepositState::AwaitingBtcFundingProof => "AWAITING_BTC_FUNDING_PROOF",
            DepositState::FailedSetup => "FAILED_SETUP",
            DepositState::Active => "ACTIVE",
            DepositState::AwaitingWithdrawalSignature => "AWAITING_WITHDRAWAL_SIGNATURE",
            DepositState::AwaitingWithdrawalProof => "AWAITING_WITHDRAWAL_PROOF",
            DepositState::Redeemed => "REDEEMED",
            DepositState::CourtesyCall => "COURTESY_CALL",
            DepositState::FraudLiquidationInProgress => "FRAUD_LIQUIDATION_IN_PROGRESS",
            DepositState::LiquidationInProgress => "LIQUIDATION_IN_PROGRESS",
            DepositState::Liquidated => "LIQUIDATED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepositState::Start => "Starting",
            DepositState::AwaitingSignerSetup => "Awaiting Signer Setup",
            DepositState::AwaitingBtcFundingProof => "Awaiting BTC Funding",
            DepositState::FailedSetup => "Setup Failed",
            DepositState::Active => "Active",
            DepositState::AwaitingWithdrawalSignature => "Redemption Requested",
            DepositState::AwaitingWithdrawalProof => "Redemption Signed",
            DepositState::Redeemed => "Redeemed",
            DepositState::CourtesyCall => "Courtesy Call",
            DepositState::FraudLiquidationInProgress => "Fraud Liquidation",
            DepositState::LiquidationInProgress => "Liquidation in Progress",
            DepositState::Liquidated => "Liquidated",
        }
    }

    pub fn tooltip(&self) -> Option<&'static str> {
        match self {
            DepositState::AwaitingSignerSetup => Some(
                "The signers are generating the Bitcoin key that will hold this deposit.",
            ),
            DepositState::AwaitingBtcFundingProof => Some(
                "Waiting for the depositor to send Bitcoin to the deposit address and prove the transaction.",
            ),
            DepositState::FailedSetup => Some(
                "The deposit was never funded or the signers failed to set up a key. No tBTC was minted.",
            ),
            DepositState::AwaitingWithdrawalSignature => Some(
                "A redemption was requested; the signers must now sign the Bitcoin transaction releasing the funds.",
            ),
            DepositState::AwaitingWithdrawalProof => Some(
                "The redemption transaction was signed; waiting for proof that it was mined on Bitcoin.",
            ),
            DepositState::CourtesyCall => Some(
                "The signer bond has fallen below the courtesy call threshold. The deposit is at risk: the owner has a grace period to redeem or top up collateral before liquidation.",
            ),
            DepositState::FraudLiquidationInProgress => Some(
                "The signers were proven to have misbehaved; their bond is being auctioned off.",
            ),
            DepositState::LiquidationInProgress => Some(
                "The signer bond fell below the liquidation threshold and is being auctioned off in exchange for tBTC.",
            ),
            DepositState::Start
            | DepositState::Active
            | DepositState::Redeemed
            | DepositState::Liquidated => None,
        }
    }

    /// States before the signers' key and Bitcoin funding are in place; nothing can have been
    /// minted yet.
    pub fn is_pre_mint(&self) -> bool {
        matches!(
            self,
            DepositState::Start
                | DepositState::AwaitingSignerSetup
                | DepositState::AwaitingBtcFundingProof
                | DepositState::FailedSetup
        )
    }

    pub fn is_redeemable(&self) -> bool {
        matches!(self, DepositState::Active | DepositState::CourtesyCall)
    }
}

impl FromStr for DepositState {
    type Err = DataContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DepositState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| DataContractViolation::UnknownState(s.to_string()))
    }
}

impl fmt::Display for DepositState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
