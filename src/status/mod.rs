use std::time::{SystemTime, UNIX_EPOCH};

use crate::deposit::{Address, Deposit, DepositState};
use crate::error::{DataContractViolation, Error};

mod collateral;
mod view;

pub use collateral::{CollateralizationStatus, resolve_collateralization_status};
pub use view::{DepositOutput, DepositView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLabel {
    pub label: &'static str,
    pub tooltip: Option<&'static str>,
}

impl From<DepositState> for StateLabel {
    fn from(state: DepositState) -> Self {
        Self {
            label: state.label(),
            tooltip: state.tooltip(),
        }
    }
}

/// Who holds the TDT token, and so the deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The token was handed to the vending machine in exchange for tBTC.
    VendingMachine,
    Creator(Address),
    Transferred(Address),
}

impl Ownership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ownership::VendingMachine => "vending_machine",
            Ownership::Creator(_) => "creator",
            Ownership::Transferred(_) => "transferred",
        }
    }
}

/// Derives everything the dashboard shows about a deposit from one indexer snapshot.
/// Holds no state beyond the vending machine address and never reads the clock.
#[derive(Debug, Clone)]
pub struct StatusResolver {
    vending_machine: Address,
}

impl StatusResolver {
    pub fn new(vending_machine: Address) -> Self {
        Self { vending_machine }
    }

    pub fn is_vending_machine(&self, address: &Address) -> bool {
        *address == self.vending_machine
    }

    /// Label for a raw indexer state name.
    pub fn resolve_state_label(current_state: &str) -> Result<StateLabel, DataContractViolation> {
        let state = current_state.parse::<DepositState>()?;
        Ok(StateLabel::from(state))
    }

    /// The token moving to the vending machine is the on-chain signal that tBTC was minted, but
    /// only once the deposit got past setup.
    pub fn has_been_used_to_mint(&self, token_owner: &Address, state: DepositState) -> bool {
        self.is_vending_machine(token_owner) && !state.is_pre_mint()
    }

    /// Only the owner may redeem an active deposit unless it was courtesy called, reached the
    /// end of its term, or is owned by the vending machine.
    pub fn is_redeemable_by_anyone(&self, deposit: &Deposit, is_at_term: bool) -> bool {
        let state = deposit.state();
        if !state.is_redeemable() {
            return false;
        }

        state == DepositState::CourtesyCall
            || is_at_term
            || self.is_vending_machine(&deposit.tdt_token().owner())
    }

    pub fn resolve_ownership(&self, deposit: &Deposit) -> Ownership {
        let token = deposit.tdt_token();
        if self.has_been_used_to_mint(&token.owner(), deposit.state()) {
            Ownership::VendingMachine
        } else if token.has_changed_hands() {
            Ownership::Transferred(token.owner())
        } else {
            Ownership::Creator(token.owner())
        }
    }
}

/// A deposit without an end of term has not reached it.
pub fn is_at_term(end_of_term: Option<u64>, now: u64) -> bool {
    end_of_term.is_some_and(|end| now >= end)
}

/// `time` as whole seconds since the epoch, the unit every indexer timestamp uses.
pub fn unix_seconds(time: SystemTime) -> Result<u64, Error> {
    Ok(time.duration_since(UNIX_EPOCH)?.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposit::fixtures::{self, CREATOR, OTHER_WALLET, VENDING_MACHINE};

    fn resolver() -> StatusResolver {
        StatusResolver::new(VENDING_MACHINE.parse().unwrap())
    }

    fn address(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn every_state_has_a_label() {
        for state in DepositState::ALL {
            let label = StatusResolver::resolve_state_label(state.as_str()).unwrap();
            assert!(!label.label.is_empty(), "{state}");
        }
    }

    #[test]
    fn unknown_state_label_rejected() {
        let result = StatusResolver::resolve_state_label("UNKNOWN");

        assert!(matches!(result, Err(DataContractViolation::UnknownState(_))));
    }

    #[test]
    fn courtesy_call_label_has_tooltip() {
        let label = StatusResolver::resolve_state_label("COURTESY_CALL").unwrap();

        assert_eq!(label.label, "Courtesy Call");
        assert!(label.tooltip.is_some());
    }

    #[test]
    fn active_label_needs_no_tooltip() {
        let label = StatusResolver::resolve_state_label("ACTIVE").unwrap();

        assert_eq!(label.label, "Active");
        assert_eq!(label.tooltip, None);
    }

    #[test]
    fn pre_mint_state_never_minted() {
        let resolver = resolver();
        for state in DepositState::ALL.into_iter().filter(|s| s.is_pre_mint()) {
            for owner in [VENDING_MACHINE, CREATOR, OTHER_WALLET] {
                assert!(!resolver.has_been_used_to_mint(&address(owner), state), "{state}");
            }
        }
    }

    #[test]
    fn vending_machine_owner_after_setup_is_minted() {
        let resolver = resolver();
        for state in DepositState::ALL.into_iter().filter(|s| !s.is_pre_mint()) {
            assert!(resolver.has_been_used_to_mint(&address(VENDING_MACHINE), state));
            assert!(!resolver.has_been_used_to_mint(&address(CREATOR), state));
        }
    }

    #[test]
    fn checksummed_vending_machine_matches_indexer_form() {
        let resolver =
            StatusResolver::new("0x526c08E5532A9308b3fb33b7968eF78a5005d2AC".parse().unwrap());

        assert!(resolver.has_been_used_to_mint(&address(VENDING_MACHINE), DepositState::Active));
    }

    #[test]
    fn active_vending_machine_deposit() {
        let resolver = resolver();
        let deposit = fixtures::deposit("ACTIVE", VENDING_MACHINE);

        assert!(resolver.has_been_used_to_mint(&deposit.tdt_token().owner(), deposit.state()));
        assert!(resolver.is_redeemable_by_anyone(&deposit, false));
        assert_eq!(resolver.resolve_ownership(&deposit), Ownership::VendingMachine);
    }

    #[test]
    fn courtesy_call_redeemable_without_vending_machine() {
        let deposit = fixtures::deposit("COURTESY_CALL", CREATOR);

        assert!(resolver().is_redeemable_by_anyone(&deposit, false));
    }

    #[test]
    fn active_creator_owned_only_redeemable_at_term() {
        let resolver = resolver();
        let deposit = fixtures::deposit("ACTIVE", CREATOR);

        assert!(!resolver.is_redeemable_by_anyone(&deposit, false));
        assert!(resolver.is_redeemable_by_anyone(&deposit, true));
    }

    #[test]
    fn non_redeemable_states_short_circuit() {
        let resolver = resolver();
        for state in DepositState::ALL.into_iter().filter(|s| !s.is_redeemable()) {
            for owner in [VENDING_MACHINE, CREATOR] {
                let deposit = fixtures::deposit(state.as_str(), owner);
                assert!(!resolver.is_redeemable_by_anyone(&deposit, true), "{state}");
                assert!(!resolver.is_redeemable_by_anyone(&deposit, false), "{state}");
            }
        }
    }

    #[test]
    fn ownership_by_creator_and_transfer() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve_ownership(&fixtures::deposit("ACTIVE", CREATOR)),
            Ownership::Creator(address(CREATOR))
        );
        assert_eq!(
            resolver.resolve_ownership(&fixtures::deposit("ACTIVE", OTHER_WALLET)),
            Ownership::Transferred(address(OTHER_WALLET))
        );
    }

    #[test]
    fn vending_machine_during_setup_is_a_transfer() {
        let deposit = fixtures::deposit("FAILED_SETUP", VENDING_MACHINE);

        assert_eq!(
            resolver().resolve_ownership(&deposit),
            Ownership::Transferred(address(VENDING_MACHINE))
        );
    }

    #[test]
    fn at_term_from_end_of_term() {
        assert!(!is_at_term(None, u64::MAX));
        assert!(!is_at_term(Some(1_615_552_000), 1_615_551_999));
        assert!(is_at_term(Some(1_615_552_000), 1_615_552_000));
        assert!(is_at_term(Some(1_615_552_000), 1_700_000_000));
    }

    #[test]
    fn clock_before_epoch_is_an_error() {
        let now = UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000);

        assert_eq!(unix_seconds(now).unwrap(), 1_600_000_000);
        assert!(matches!(
            unix_seconds(UNIX_EPOCH - std::time::Duration::from_secs(1)),
            Err(Error::Clock(_))
        ));
    }
}
