#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use deposit_status::deposit::{Address, Deposit, DepositRow, DepositState};
use deposit_status::error::DataContractViolation;
use deposit_status::format::{bitcoin_to_satoshis, format_percent, satoshis_to_bitcoin};
use deposit_status::status::{CollateralizationStatus, StatusResolver};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;
use serde_json::json;

const VENDING_MACHINE: &str = "0x526c08e5532a9308b3fb33b7968ef78a5005d2ac";
const CREATOR: &str = "0x1111111111111111111111111111111111111111";
const OTHER_WALLET: &str = "0x2222222222222222222222222222222222222222";

#[derive(Debug)]
struct FuzzDeposit {
    state: DepositState,
    owner: &'static str,
    lot_size_satoshis: u64,
    total_bond_wei: u128,
    honest_threshold: u32,
    member_count: u8,
    end_of_term: Option<u64>,
    now: u64,
    thresholds: (u32, u32, u32),
    live_percent: u32,
}

impl<'a> Arbitrary<'a> for FuzzDeposit {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self, libfuzzer_sys::arbitrary::Error> {
        let state = DepositState::ALL[u.int_in_range(0..=DepositState::ALL.len() - 1)?];
        let owner = match u.int_in_range(0..=2)? {
            0 => VENDING_MACHINE,
            1 => CREATOR,
            _ => OTHER_WALLET,
        };

        Ok(FuzzDeposit {
            state,
            owner,
            lot_size_satoshis: u.arbitrary()?,
            total_bond_wei: u.arbitrary()?,
            // Bias toward small keeps so the threshold check is actually hit
            honest_threshold: u.int_in_range(0..=16)?,
            member_count: u.int_in_range(0..=16)?,
            end_of_term: u.arbitrary()?,
            now: u.arbitrary()?,
            thresholds: u.arbitrary()?,
            live_percent: u.arbitrary()?,
        })
    }
}

impl FuzzDeposit {
    fn row(&self) -> serde_json::Value {
        let members: Vec<_> = (0..self.member_count)
            .map(|i| json!({ "address": format!("0x{:040x}", u64::from(i) + 1) }))
            .collect();

        json!({
            "id": "0xd0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0",
            "currentState": self.state.as_str(),
            "lotSizeSatoshis": self.lot_size_satoshis.to_string(),
            "createdAt": "1600000000",
            "endOfTerm": self.end_of_term.map(|end| end.to_string()),
            "tdtToken": { "tokenID": "1", "owner": self.owner, "minter": CREATOR },
            "initialCollateralizedPercent": self.thresholds.0,
            "undercollateralizedThresholdPercent": self.thresholds.1,
            "severelyUndercollateralizedThresholdPercent": self.thresholds.2,
            "bondedECDSAKeep": {
                "keepAddress": "0x3333333333333333333333333333333333333333",
                "totalBondAmount": self.total_bond_wei.to_string(),
                "status": "ACTIVE",
                "honestThreshold": self.honest_threshold,
                "members": members
            }
        })
    }
}

fuzz_target!(|input: FuzzDeposit| {
    let satoshis = input.lot_size_satoshis;
    assert_eq!(bitcoin_to_satoshis(&satoshis_to_bitcoin(satoshis)), Ok(satoshis));

    let Ok(row) = serde_json::from_value::<DepositRow>(input.row()) else {
        panic!("generated row must decode: {:?}", input);
    };
    let deposit = match Deposit::try_from(row) {
        Ok(deposit) => deposit,
        Err(DataContractViolation::HonestThresholdExceedsMembers { .. }) => {
            assert!(input.honest_threshold > u32::from(input.member_count));
            return;
        }
        Err(DataContractViolation::InvalidNumber { field: "totalBondAmount", .. }) => {
            assert!(input.total_bond_wei > i128::MAX as u128);
            return;
        }
        Err(e) => panic!("unexpected rejection {}: {:?}", e, input),
    };

    let vending_machine: Address = VENDING_MACHINE.parse().unwrap();
    let resolver = StatusResolver::new(vending_machine);

    if input.state.is_pre_mint() {
        assert!(!resolver.has_been_used_to_mint(&deposit.tdt_token().owner(), deposit.state()));
    }
    if !input.state.is_redeemable() {
        assert!(!resolver.is_redeemable_by_anyone(&deposit, true));
    }

    let live = Decimal::from(input.live_percent);
    let status = deposit.thresholds().classify(live);
    if input.live_percent > 0 {
        let lower = deposit.thresholds().classify(live - Decimal::ONE);
        assert!(lower >= status);
    }
    if live <= Decimal::from(input.thresholds.2) {
        assert_eq!(status, CollateralizationStatus::Severe);
    }

    let percent = format_percent(
        u64::from(deposit.keep().honest_threshold()),
        deposit.keep().members().len() as u64,
    );
    assert_eq!(percent.is_err(), input.member_count == 0);

    // Views only fail on out-of-range display values, never panic
    let _ = resolver.resolve(&deposit, input.now);
});
