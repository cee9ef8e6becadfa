use crate::config::NetworkConfig;
use crate::deposit::Address;

/// Explorer page of a contract or wallet.
pub fn address_url(config: &NetworkConfig, address: &Address) -> String {
    format!("https://{}/address/{}", config.etherscan_domain, address)
}

/// Explorer page of one TDT token, i.e. one deposit's ownership record.
pub fn token_url(config: &NetworkConfig, token_id: &str) -> String {
    format!(
        "https://{}/token/{}?a={}",
        config.etherscan_domain, config.tdt_token, token_id
    )
}

pub fn redeem_url(config: &NetworkConfig, deposit_id: &str) -> String {
    format!("https://{}/deposit/{}/redeem", config.dapp_domain, deposit_id)
}
