use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub id: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainConfig>,
}

impl ExplorerConfig {
    pub fn chain(&self, id: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.id == id)
    }
}

fn chain(name: &str, id: &str, currency: &str) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        id: id.to_string(),
        currency: currency.to_string(),
    }
}

fn default_chains() -> Vec<ChainConfig> {
    vec![
        chain("Ethereum Mainnet", "1", "ETH"),
        chain("Sepolia Testnet", "11155111", "ETH"),
        chain("Arbitrum One", "42161", "ETH"),
        chain("Polygon Mainnet", "137", "POL"),
        chain("Optimism", "10", "ETH"),
        chain("Base Mainnet", "8453", "ETH"),
        chain("BSC Mainnet", "56", "BNB"),
        chain("Linea Mainnet", "59144", "ETH"),
        chain("Scroll Mainnet", "534352", "ETH"),
        chain("Gnosis Chain", "100", "XDAI"),
    ]
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/v2".to_string(),
            api_key: None,
            chains: default_chains(),
        }
    }
}
