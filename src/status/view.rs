use serde::Serialize;

use super::{CollateralizationStatus, Ownership, StateLabel, StatusResolver, is_at_term};
use crate::config::NetworkConfig;
use crate::deposit::{Address, Deposit, DepositState};
use crate::error::DataContractViolation;
use crate::format;
use crate::links;

/// Everything derived from one deposit snapshot, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositView {
    id: String,
    created_at: u64,
    created_at_display: String,
    end_of_term_display: Option<String>,
    lot_size_btc: String,
    state: DepositState,
    state_label: StateLabel,
    minted: bool,
    ownership: Ownership,
    creator: Address,
    token_id: String,
    redeemable_by_anyone: bool,
    at_term: bool,
    keep_address: Address,
    keep_status: String,
    bond_eth: String,
    collateralization: Option<CollateralizationStatus>,
    thresholds: String,
    honest_threshold: String,
    liquidation_cause: Option<String>,
}

impl DepositView {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn lot_size_btc(&self) -> &str {
        &self.lot_size_btc
    }

    pub fn state(&self) -> DepositState {
        self.state
    }

    pub fn state_label(&self) -> StateLabel {
        self.state_label
    }

    pub fn minted(&self) -> bool {
        self.minted
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Whoever opened the deposit and minted its TDT token.
    pub fn creator(&self) -> Address {
        self.creator
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn redeemable_by_anyone(&self) -> bool {
        self.redeemable_by_anyone
    }

    pub fn at_term(&self) -> bool {
        self.at_term
    }

    pub fn keep_address(&self) -> Address {
        self.keep_address
    }

    pub fn keep_status(&self) -> &str {
        &self.keep_status
    }

    pub fn bond_eth(&self) -> &str {
        &self.bond_eth
    }

    pub fn collateralization(&self) -> Option<CollateralizationStatus> {
        self.collateralization
    }

    pub fn thresholds(&self) -> &str {
        &self.thresholds
    }

    pub fn honest_threshold(&self) -> &str {
        &self.honest_threshold
    }

    /// Sort key for output: oldest deposit first, id breaking ties.
    pub fn sort_key(&self) -> (u64, &str) {
        (self.created_at, &self.id)
    }
}

impl StatusResolver {
    /// Derives the full view of `deposit` as of `now` (seconds since the epoch).
    pub fn resolve(&self, deposit: &Deposit, now: u64) -> Result<DepositView, DataContractViolation> {
        let state = deposit.state();
        let keep = deposit.keep();
        let thresholds = deposit.thresholds();
        let at_term = is_at_term(deposit.end_of_term(), now);

        Ok(DepositView {
            id: deposit.id().to_string(),
            created_at: deposit.created_at(),
            created_at_display: format::format_timestamp(deposit.created_at())?,
            end_of_term_display: deposit
                .end_of_term()
                .map(format::format_timestamp)
                .transpose()?,
            lot_size_btc: format::satoshis_to_bitcoin(deposit.lot_size_satoshis()),
            state,
            state_label: StateLabel::from(state),
            minted: self.has_been_used_to_mint(&deposit.tdt_token().owner(), state),
            ownership: self.resolve_ownership(deposit),
            creator: deposit.tdt_token().minter(),
            token_id: deposit.tdt_token().token_id().to_string(),
            redeemable_by_anyone: self.is_redeemable_by_anyone(deposit, at_term),
            at_term,
            keep_address: keep.keep_address(),
            keep_status: keep.status().to_string(),
            bond_eth: format::format_eth(keep.total_bond_wei())?,
            collateralization: deposit
                .collateralization_percent()
                .map(|live| thresholds.classify(live)),
            thresholds: format!(
                "{} / {} / {}",
                format::format_threshold(thresholds.initial),
                format::format_threshold(thresholds.undercollateralized),
                format::format_threshold(thresholds.severely_undercollateralized)
            ),
            honest_threshold: format::format_percent(
                u64::from(keep.honest_threshold()),
                keep.members().len() as u64,
            )?,
            liquidation_cause: deposit.liquidation().map(|l| l.cause().to_string()),
        })
    }
}

/// One CSV row of the command line output.
#[derive(Debug, Serialize)]
pub struct DepositOutput {
    id: String,
    lot_size_btc: String,
    state: &'static str,
    state_label: &'static str,
    created_at: String,
    end_of_term: Option<String>,
    tbtc_minted: bool,
    ownership: &'static str,
    owner: Option<String>,
    creator: String,
    token_url: String,
    redeemable_by_anyone: bool,
    at_term: bool,
    keep_address: String,
    keep_status: String,
    bond_eth: String,
    collateralization: Option<&'static str>,
    thresholds: String,
    honest_threshold: String,
    liquidation_cause: Option<String>,
    vending_machine_url: Option<String>,
    redeem_url: Option<String>,
}

impl DepositOutput {
    pub fn new(view: DepositView, config: &NetworkConfig) -> Self {
        let owner = match view.ownership {
            Ownership::VendingMachine => None,
            Ownership::Creator(owner) | Ownership::Transferred(owner) => Some(owner.to_string()),
        };
        let redeem_url = view
            .redeemable_by_anyone
            .then(|| links::redeem_url(config, &view.id));
        let vending_machine_url = view
            .minted
            .then(|| links::address_url(config, &config.vending_machine));

        Self {
            lot_size_btc: view.lot_size_btc,
            state: view.state.as_str(),
            state_label: view.state_label.label,
            created_at: view.created_at_display,
            end_of_term: view.end_of_term_display,
            tbtc_minted: view.minted,
            ownership: view.ownership.as_str(),
            owner,
            creator: view.creator.to_string(),
            token_url: links::token_url(config, &view.token_id),
            redeemable_by_anyone: view.redeemable_by_anyone,
            at_term: view.at_term,
            keep_address: view.keep_address.to_string(),
            keep_status: view.keep_status,
            bond_eth: view.bond_eth,
            collateralization: view.collateralization.map(|c| c.as_str()),
            thresholds: view.thresholds,
            honest_threshold: view.honest_threshold,
            liquidation_cause: view.liquidation_cause,
            vending_machine_url,
            redeem_url,
            id: view.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::deposit::fixtures::{self, CREATOR, VENDING_MACHINE};

    const NOW: u64 = 1_700_000_000;

    fn resolver() -> StatusResolver {
        StatusResolver::new(VENDING_MACHINE.parse().unwrap())
    }

    #[test]
    fn minted_deposit_view() {
        let deposit = fixtures::deposit("ACTIVE", VENDING_MACHINE);

        let view = resolver().resolve(&deposit, NOW).unwrap();

        assert_eq!(view.lot_size_btc(), "1.00");
        assert_eq!(view.state_label().label, "Active");
        assert!(view.minted());
        assert_eq!(view.ownership(), Ownership::VendingMachine);
        assert!(view.redeemable_by_anyone());
        assert_eq!(view.bond_eth(), "150.00");
        assert_eq!(view.thresholds(), "150% / 125% / 110%");
        assert_eq!(view.honest_threshold(), "60%");
        assert_eq!(view.collateralization(), None);
        assert_eq!(view.creator(), CREATOR.parse::<Address>().unwrap());
        assert_eq!(view.token_id(), "1192180011223344556677889900");
        assert_eq!(view.keep_address().to_string(), "0x3333333333333333333333333333333333333333");
        assert_eq!(view.keep_status(), "ACTIVE");
    }

    #[test]
    fn end_of_term_drives_redemption() {
        let deposit = fixtures::deposit("ACTIVE", CREATOR);
        let end = deposit.end_of_term().unwrap();

        let before = resolver().resolve(&deposit, end - 1).unwrap();
        let after = resolver().resolve(&deposit, end).unwrap();

        assert!(!before.at_term());
        assert!(!before.redeemable_by_anyone());
        assert!(after.at_term());
        assert!(after.redeemable_by_anyone());
    }

    #[test]
    fn live_collateralization_classified() {
        let mut value = fixtures::row();
        value["currentState"] = json!("COURTESY_CALL");
        value["collateralizationPercent"] = json!("118.5");
        let deposit = fixtures::decode(value).unwrap();

        let view = resolver().resolve(&deposit, NOW).unwrap();

        assert_eq!(
            view.collateralization(),
            Some(CollateralizationStatus::CourtesyCall)
        );
        assert_eq!(
            deposit.thresholds().classify(Decimal::new(1185, 1)),
            CollateralizationStatus::CourtesyCall
        );
    }

    #[test]
    fn keep_without_members_is_a_contract_violation() {
        let mut value = fixtures::row();
        value["bondedECDSAKeep"]["members"] = json!([]);
        value["bondedECDSAKeep"]["honestThreshold"] = json!(0);
        let deposit = fixtures::decode(value).unwrap();

        let result = resolver().resolve(&deposit, NOW);

        assert_eq!(
            result,
            Err(DataContractViolation::ZeroDenominator { numerator: 0 })
        );
    }

    #[test]
    fn output_links_redeemable_deposits_only() {
        let config = NetworkConfig::from_lookup(|_| None).unwrap();
        let resolver = StatusResolver::new(config.vending_machine);

        let minted = resolver
            .resolve(&fixtures::deposit("ACTIVE", VENDING_MACHINE), NOW)
            .unwrap();
        let redeemed = resolver
            .resolve(&fixtures::deposit("REDEEMED", CREATOR), NOW)
            .unwrap();

        let minted = DepositOutput::new(minted, &config);
        let redeemed = DepositOutput::new(redeemed, &config);

        assert_eq!(
            minted.redeem_url.as_deref(),
            Some("https://dapp.tbtc.network/deposit/0xd0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0/redeem")
        );
        assert_eq!(minted.owner, None);
        assert_eq!(redeemed.redeem_url, None);
        assert_eq!(redeemed.owner.as_deref(), Some(CREATOR));
    }

    #[test]
    fn output_links_token_and_vending_machine() {
        let config = NetworkConfig::from_lookup(|_| None).unwrap();
        let resolver = StatusResolver::new(config.vending_machine);

        let minted = resolver
            .resolve(&fixtures::deposit("ACTIVE", VENDING_MACHINE), NOW)
            .unwrap();
        let held = resolver
            .resolve(&fixtures::deposit("ACTIVE", CREATOR), NOW)
            .unwrap();

        let minted = DepositOutput::new(minted, &config);
        let held = DepositOutput::new(held, &config);

        assert_eq!(
            minted.token_url,
            "https://etherscan.io/token/0x10b66bd1e3b5a936b7f8dbc5976004311037cdf0?a=1192180011223344556677889900"
        );
        assert_eq!(
            minted.vending_machine_url.as_deref(),
            Some("https://etherscan.io/address/0x526c08e5532a9308b3fb33b7968ef78a5005d2ac")
        );
        assert_eq!(minted.creator, CREATOR);
        assert_eq!(minted.keep_status, "ACTIVE");
        assert_eq!(held.vending_machine_url, None);
        assert_eq!(held.token_url, minted.token_url);
    }
}
