use async_trait::async_trait;
use futures_util::future::join;
use serde::Deserialize;
use tracing::debug;
use tracing::warn;

use crate::config::ExplorerConfig;
use crate::error::FetchError;
use crate::model::DateRange;
use crate::model::Transaction;
use crate::model::TxKind;
use crate::model::TxStatus;

use super::HistoryProvider;

const PAGE_SIZE: &str = "1000";

/// Etherscan-v2-style block-explorer client. One logical history fetch
/// fans out into the native (`txlist`) and token (`tokentx`) actions;
/// the calls run concurrently and either one failing still yields the
/// other's rows.
pub struct HttpExplorer {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    config: ExplorerConfig,
}

impl HttpExplorer {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/api", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            config,
        }
    }

    async fn query_action(
        &self,
        action: &str,
        address: &str,
        chain_id: &str,
    ) -> Result<Vec<serde_json::Value>, FetchError> {
        let mut params = vec![
            ("chainid", chain_id.to_string()),
            ("module", "account".to_string()),
            ("action", action.to_string()),
            ("address", address.to_string()),
            ("page", "1".to_string()),
            ("offset", PAGE_SIZE.to_string()),
            ("sort", "desc".to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.clone()));
        }

        debug!("explorer_query::action::{}::address::{}::chain::{}", action, address, chain_id);

        let response = self.http.get(self.base_url.as_str()).query(&params).send().await?;
        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        // Etherscan reports "0" both for errors and for empty result sets;
        // an empty array is data, not a failure.
        if envelope.status != "1" {
            if envelope.result.as_array().is_some_and(|rows| rows.is_empty()) {
                return Ok(Vec::new());
            }
            return Err(FetchError::Api(envelope.message.unwrap_or_else(|| "unknown error".to_string())));
        }

        envelope
            .result
            .as_array()
            .cloned()
            .ok_or_else(|| FetchError::Decode("result is not an array".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    message: Option<String>,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NativeRow {
    time_stamp: String,
    hash: String,
    from: String,
    #[serde(default)]
    to: String,
    value: String,
    #[serde(default)]
    is_error: String,
    #[serde(default)]
    function_name: String,
    #[serde(default)]
    input: String,
    #[serde(default)]
    block_number: String,
    #[serde(default)]
    gas_used: String,
    #[serde(default)]
    gas_price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenRow {
    time_stamp: String,
    hash: String,
    from: String,
    to: String,
    value: String,
    #[serde(default)]
    token_symbol: String,
    #[serde(default)]
    token_decimal: String,
    #[serde(default)]
    block_number: String,
}

fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    raw.parse::<i64>().ok().and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
}

fn native_to_transaction(
    row: NativeRow,
    currency: &str,
) -> Option<Transaction> {
    let timestamp = parse_timestamp(&row.time_stamp)?;
    let value = row.value.parse::<f64>().unwrap_or(0.0) / 1e18;
    let fee = {
        let gas_used = row.gas_used.parse::<f64>().unwrap_or(0.0);
        let gas_price = row.gas_price.parse::<f64>().unwrap_or(0.0);
        gas_used * gas_price / 1e18
    };
    let method = if !row.function_name.is_empty() {
        row.function_name.split('(').next().unwrap_or("Transfer").to_string()
    } else if !row.input.is_empty() && row.input != "0x" {
        "Contract".to_string()
    } else {
        "Transfer".to_string()
    };

    Some(Transaction {
        id: Transaction::generate_id(),
        hash: row.hash,
        method,
        block: row.block_number.parse().unwrap_or(0),
        timestamp,
        from: row.from,
        to: if row.to.is_empty() { "Contract Creation".to_string() } else { row.to },
        value,
        token: currency.to_uppercase(),
        fee: Some(fee),
        kind: TxKind::Native,
        status: if row.is_error == "0" { TxStatus::Success } else { TxStatus::Failed },
    })
}

fn token_to_transaction(row: TokenRow) -> Option<Transaction> {
    let timestamp = parse_timestamp(&row.time_stamp)?;
    let decimals = row.token_decimal.parse::<u32>().unwrap_or(18);
    let value = row.value.parse::<f64>().unwrap_or(0.0) / 10f64.powi(decimals as i32);
    let symbol = if row.token_symbol.is_empty() {
        "TOKEN".to_string()
    } else {
        row.token_symbol.to_uppercase()
    };

    Some(Transaction {
        id: Transaction::generate_id(),
        hash: row.hash,
        method: "Transfer [ERC20]".to_string(),
        block: row.block_number.parse().unwrap_or(0),
        timestamp,
        from: row.from,
        to: row.to,
        value,
        token: symbol,
        fee: None,
        kind: TxKind::Erc20,
        status: TxStatus::Success,
    })
}

fn in_range(
    tx: &Transaction,
    range: Option<&DateRange>,
) -> bool {
    range.is_none_or(|r| r.contains(tx.timestamp))
}

#[async_trait]
impl HistoryProvider for HttpExplorer {
    async fn fetch_history(
        &self,
        address: &str,
        network: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<Transaction>, FetchError> {
        if !address.starts_with("0x") || address.len() != 42 {
            return Err(FetchError::InvalidAddress {
                network: network.to_string(),
                address: address.to_string(),
            });
        }

        let chain = self
            .config
            .chain(network)
            .ok_or_else(|| FetchError::UnsupportedNetwork(network.to_string()))?;
        let currency = chain.currency.clone();

        let (native_res, token_res) = join(
            self.query_action("txlist", address, network),
            self.query_action("tokentx", address, network),
        )
        .await;

        // Partial tolerance: a token-action failure must not discard the
        // native rows, and vice versa. Only a double failure errors.
        let mut transactions = Vec::new();
        let mut first_error: Option<FetchError> = None;
        let mut any_success = false;

        match native_res {
            Ok(rows) => {
                any_success = true;
                transactions.extend(
                    rows.into_iter()
                        .filter_map(|v| serde_json::from_value::<NativeRow>(v).ok())
                        .filter_map(|row| native_to_transaction(row, &currency)),
                );
            },
            Err(e) => {
                warn!("native_action_failed::address::{}::error::{}", address, e);
                first_error = Some(e);
            },
        }

        match token_res {
            Ok(rows) => {
                any_success = true;
                transactions.extend(
                    rows.into_iter()
                        .filter_map(|v| serde_json::from_value::<TokenRow>(v).ok())
                        .filter_map(token_to_transaction),
                );
            },
            Err(e) => {
                warn!("token_action_failed::address::{}::error::{}", address, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            },
        }

        if !any_success {
            return Err(first_error.unwrap_or_else(|| FetchError::Api("no data".to_string())));
        }

        transactions.retain(|tx| in_range(tx, range));
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(transactions)
    }
}
