use std::env;

use log::debug;

use crate::deposit::Address;
use crate::error::Error;

const MAINNET_VENDING_MACHINE: &str = "0x526c08E5532A9308b3fb33b7968eF78a5005d2AC";
const MAINNET_TDT_TOKEN: &str = "0x10B66Bd1e3b5a936B7f8Dbc5976004311037cDF0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Ropsten,
}

impl Network {
    fn etherscan_domain(&self) -> &'static str {
        match self {
            Network::Mainnet => "etherscan.io",
            Network::Ropsten => "ropsten.etherscan.io",
        }
    }

    fn dapp_domain(&self) -> &'static str {
        match self {
            Network::Mainnet => "dapp.tbtc.network",
            Network::Ropsten => "dapp.test.tbtc.network",
        }
    }

    // Testnet contracts get redeployed, so only mainnet has built-in addresses.
    fn vending_machine(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some(MAINNET_VENDING_MACHINE),
            Network::Ropsten => None,
        }
    }

    fn tdt_token(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some(MAINNET_TDT_TOKEN),
            Network::Ropsten => None,
        }
    }
}

/// Where links point and which contracts are special, per network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    pub etherscan_domain: String,
    pub dapp_domain: String,
    pub vending_machine: Address,
    pub tdt_token: Address,
}

impl NetworkConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `TBTC_NETWORK`, `TBTC_ETHERSCAN_DOMAIN`, `TBTC_DAPP_DOMAIN`,
    /// `TBTC_VENDING_MACHINE` and `TBTC_TDT_TOKEN` through `lookup`, falling back to the
    /// network's defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let network = match lookup("TBTC_NETWORK").as_deref() {
            None | Some("mainnet") => Network::Mainnet,
            Some("ropsten") => Network::Ropsten,
            Some(other) => {
                return Err(Error::InvalidConfig {
                    key: "TBTC_NETWORK",
                    reason: format!("unknown network {other:?}"),
                });
            }
        };

        let config = NetworkConfig {
            network,
            etherscan_domain: lookup("TBTC_ETHERSCAN_DOMAIN")
                .unwrap_or_else(|| network.etherscan_domain().to_string()),
            dapp_domain: lookup("TBTC_DAPP_DOMAIN")
                .unwrap_or_else(|| network.dapp_domain().to_string()),
            vending_machine: address_setting(
                "TBTC_VENDING_MACHINE",
                lookup("TBTC_VENDING_MACHINE"),
                network.vending_machine(),
            )?,
            tdt_token: address_setting(
                "TBTC_TDT_TOKEN",
                lookup("TBTC_TDT_TOKEN"),
                network.tdt_token(),
            )?,
        };

        debug!("Network config: {:?}", config);
        Ok(config)
    }
}

fn address_setting(
    key: &'static str,
    value: Option<String>,
    default: Option<&'static str>,
) -> Result<Address, Error> {
    let value = value
        .or_else(|| default.map(str::to_string))
        .ok_or_else(|| Error::InvalidConfig {
            key,
            reason: "required on this network".to_string(),
        })?;

    value.parse::<Address>().map_err(|e| Error::InvalidConfig {
        key,
        reason: format!("{e}"),
    })
}
