#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use fake::Fake;
use fake::Faker;

use chainscope::error::FetchError;
use chainscope::fetch::HistoryProvider;
use chainscope::model::DateRange;
use chainscope::model::Transaction;
use chainscope::model::TxKind;
use chainscope::model::TxStatus;

static HASH_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Transfer with a unique synthetic hash.
pub fn transfer(
    from: &str,
    to: &str,
    value: f64,
    kind: TxKind,
) -> Transaction {
    let n = HASH_COUNTER.fetch_add(1, Ordering::Relaxed);
    transfer_with_hash(from, to, value, kind, &format!("0xhash{n:08}"))
}

pub fn transfer_with_hash(
    from: &str,
    to: &str,
    value: f64,
    kind: TxKind,
    hash: &str,
) -> Transaction {
    Transaction {
        id: Transaction::generate_id(),
        hash: hash.to_string(),
        method: "Transfer".to_string(),
        block: 1,
        timestamp: base_time(),
        from: from.to_string(),
        to: to.to_string(),
        value,
        token: if kind == TxKind::Native { "ETH".to_string() } else { "USDC".to_string() },
        fee: if kind == TxKind::Native { Some(0.001) } else { None },
        kind,
        status: TxStatus::Success,
    }
}

pub fn native(from: &str, to: &str, value: f64) -> Transaction {
    transfer(from, to, value, TxKind::Native)
}

pub fn sample_addresses(count: usize) -> Vec<String> {
    (0..count).map(|_| format!("0x{:040x}", Faker.fake::<u128>())).collect()
}

/// Scripted history source: per-address transaction lists plus a set of
/// addresses that always fail. Every query is logged so tests can assert
/// the no-requery guarantee.
pub struct MockHistoryProvider {
    histories: HashMap<String, Vec<Transaction>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockHistoryProvider {
    pub fn new() -> Self {
        Self {
            histories: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_history(
        mut self,
        address: &str,
        transactions: Vec<Transaction>,
    ) -> Self {
        self.histories.insert(address.to_lowercase(), transactions);
        self
    }

    pub fn with_failure(
        mut self,
        address: &str,
    ) -> Self {
        self.failing.insert(address.to_lowercase());
        self
    }

    /// Every address queried, in call order (lowercased).
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryProvider for MockHistoryProvider {
    async fn fetch_history(
        &self,
        address: &str,
        _network: &str,
        _range: Option<&DateRange>,
    ) -> Result<Vec<Transaction>, FetchError> {
        let key = address.to_lowercase();
        self.calls.lock().unwrap().push(key.clone());

        if self.failing.contains(&key) {
            return Err(FetchError::Api("scripted failure".to_string()));
        }
        Ok(self.histories.get(&key).cloned().unwrap_or_default())
    }
}
