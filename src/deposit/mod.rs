use rust_decimal::Decimal;
use serde::Deserialize;

mod address;
mod numeric;
mod state;

pub use address::Address;
pub use numeric::NumericField;
pub use state::DepositState;

use crate::error::DataContractViolation;

/// A deposit exactly as the indexer returns it. Nothing here is trusted until it has been
/// converted into a [`Deposit`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRow {
    id: String,
    current_state: String,
    lot_size_satoshis: NumericField,
    created_at: NumericField,
    #[serde(default)]
    end_of_term: Option<NumericField>,
    tdt_token: TdtTokenRow,
    #[serde(rename = "bondedECDSAKeep")]
    bonded_ecdsa_keep: KeepRow,
    initial_collateralized_percent: NumericField,
    undercollateralized_threshold_percent: NumericField,
    severely_undercollateralized_threshold_percent: NumericField,
    #[serde(default)]
    collateralization_percent: Option<NumericField>,
    #[serde(default)]
    deposit_liquidation: Option<LiquidationRow>,
}

impl DepositRow {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TdtTokenRow {
    #[serde(rename = "tokenID")]
    token_id: String,
    owner: String,
    minter: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeepRow {
    keep_address: String,
    total_bond_amount: NumericField,
    status: String,
    honest_threshold: NumericField,
    members: Vec<MemberRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct MemberRow {
    address: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LiquidationRow {
    cause: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    id: String,
    state: DepositState,
    lot_size_satoshis: u64,
    created_at: u64,
    end_of_term: Option<u64>,
    tdt_token: TdtToken,
    keep: BondedKeep,
    thresholds: CollateralThresholds,
    collateralization_percent: Option<Decimal>,
    liquidation: Option<Liquidation>,
}

impl Deposit {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> DepositState {
        self.state
    }

    pub fn lot_size_satoshis(&self) -> u64 {
        self.lot_size_satoshis
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn end_of_term(&self) -> Option<u64> {
        self.end_of_term
    }

    pub fn tdt_token(&self) -> &TdtToken {
        &self.tdt_token
    }

    pub fn keep(&self) -> &BondedKeep {
        &self.keep
    }

    pub fn thresholds(&self) -> CollateralThresholds {
        self.thresholds
    }

    /// Live collateralization as reported by the indexer, when it reports one.
    pub fn collateralization_percent(&self) -> Option<Decimal> {
        self.collateralization_percent
    }

    pub fn liquidation(&self) -> Option<&Liquidation> {
        self.liquidation.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TdtToken {
    token_id: String,
    owner: Address,
    minter: Address,
}

impl TdtToken {
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn minter(&self) -> Address {
        self.minter
    }

    /// Owner and minter only diverge once the token changes hands.
    pub fn has_changed_hands(&self) -> bool {
        self.owner != self.minter
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BondedKeep {
    keep_address: Address,
    total_bond_wei: u128,
    status: String,
    honest_threshold: u32,
    members: Vec<Address>,
}

impl BondedKeep {
    pub fn keep_address(&self) -> Address {
        self.keep_address
    }

    pub fn total_bond_wei(&self) -> u128 {
        self.total_bond_wei
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn honest_threshold(&self) -> u32 {
        self.honest_threshold
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }
}

/// Collateralization thresholds in percent, `150` meaning 150%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollateralThresholds {
    pub initial: u32,
    pub undercollateralized: u32,
    pub severely_undercollateralized: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Liquidation {
    cause: String,
}

impl Liquidation {
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl TryFrom<DepositRow> for Deposit {
    type Error = DataContractViolation;

    fn try_from(row: DepositRow) -> Result<Self, Self::Error> {
        let state = row.current_state.parse::<DepositState>()?;

        let keep = BondedKeep::from_row(row.bonded_ecdsa_keep)?;

        let tdt_token = TdtToken {
            token_id: row.tdt_token.token_id,
            owner: row.tdt_token.owner.parse()?,
            minter: row.tdt_token.minter.parse()?,
        };

        let thresholds = CollateralThresholds {
            initial: row
                .initial_collateralized_percent
                .to_u32("initialCollateralizedPercent")?,
            undercollateralized: row
                .undercollateralized_threshold_percent
                .to_u32("undercollateralizedThresholdPercent")?,
            severely_undercollateralized: row
                .severely_undercollateralized_threshold_percent
                .to_u32("severelyUndercollateralizedThresholdPercent")?,
        };

        Ok(Deposit {
            id: row.id,
            state,
            lot_size_satoshis: row.lot_size_satoshis.to_u64("lotSizeSatoshis")?,
            created_at: row.created_at.to_u64("createdAt")?,
            end_of_term: row
                .end_of_term
                .map(|end| end.to_u64("endOfTerm"))
                .transpose()?,
            tdt_token,
            keep,
            thresholds,
            collateralization_percent: row
                .collateralization_percent
                .map(|live| live.to_decimal("collateralizationPercent"))
                .transpose()?,
            liquidation: row
                .deposit_liquidation
                .map(|liquidation| Liquidation {
                    cause: liquidation.cause,
                }),
        })
    }
}

impl BondedKeep {
    fn from_row(row: KeepRow) -> Result<Self, DataContractViolation> {
        let members = row
            .members
            .iter()
            .map(|member| member.address.parse::<Address>())
            .collect::<Result<Vec<_>, _>>()?;

        let honest_threshold = row.honest_threshold.to_u32("honestThreshold")?;
        if honest_threshold as usize > members.len() {
            return Err(DataContractViolation::HonestThresholdExceedsMembers {
                threshold: honest_threshold,
                members: members.len(),
            });
        }

        Ok(BondedKeep {
            keep_address: row.keep_address.parse()?,
            total_bond_wei: row.total_bond_amount.to_u128("totalBondAmount")?,
            status: row.status,
            honest_threshold,
            members,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{Value, json};

    use super::{Deposit, DepositRow};

    pub const VENDING_MACHINE: &str = "0x526c08e5532a9308b3fb33b7968ef78a5005d2ac";
    pub const CREATOR: &str = "0x1111111111111111111111111111111111111111";
    pub const OTHER_WALLET: &str = "0x2222222222222222222222222222222222222222";

    /// An active 1 BTC deposit still held by its creator, as the indexer returns it.
    pub fn row() -> Value {
        json!({
            "__typename": "Deposit",
            "id": "0xd0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0",
            "contractAddress": "0xd0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0",
            "currentState": "ACTIVE",
            "lotSizeSatoshis": "100000000",
            "createdAt": "1600000000",
            "endOfTerm": "1615552000",
            "tdtToken": {
                "id": "tdt-1",
                "tokenID": "1192180011223344556677889900",
                "owner": CREATOR,
                "minter": CREATOR
            },
            "initialCollateralizedPercent": 150,
            "undercollateralizedThresholdPercent": 125,
            "severelyUndercollateralizedThresholdPercent": 110,
            "bondedECDSAKeep": {
                "id": "keep-1",
                "keepAddress": "0x3333333333333333333333333333333333333333",
                "totalBondAmount": "150000000000000000000",
                "publicKey": "0x04aa",
                "status": "ACTIVE",
                "honestThreshold": 3,
                "members": [
                    { "id": "m1", "address": "0x4444444444444444444444444444444444444441" },
                    { "id": "m2", "address": "0x4444444444444444444444444444444444444442" },
                    { "id": "m3", "address": "0x4444444444444444444444444444444444444443" },
                    { "id": "m4", "address": "0x4444444444444444444444444444444444444444" },
                    { "id": "m5", "address": "0x4444444444444444444444444444444444444445" }
                ]
            },
            "depositLiquidation": null
        })
    }

    pub fn decode(value: Value) -> Result<Deposit, crate::error::DataContractViolation> {
        let row: DepositRow = serde_json::from_value(value).unwrap();
        Deposit::try_from(row)
    }

    pub fn deposit(state: &str, owner: &str) -> Deposit {
        let mut value = row();
        value["currentState"] = json!(state);
        value["tdtToken"]["owner"] = json!(owner);
        decode(value).unwrap()
    }
}
