use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Transaction;
use crate::model::TxKind;
use crate::model::TxStatus;

/// Kind signal attached to an import: either the user's hint or the
/// classifier's detection. `Mixed` defers to per-row token presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Native,
    Erc20,
    Mixed,
}

/// Output shape of the external column classifier. The classifier itself
/// is an excluded collaborator; this crate only consumes the mapping to
/// construct transactions. An index of -1 marks an absent column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub from_index: i32,
    pub to_index: i32,
    pub value_index: i32,
    pub token_index: i32,
    pub timestamp_index: i32,
    pub hash_index: i32,
    pub method_index: i32,
    pub block_index: i32,
    pub fee_index: i32,
    pub has_header: bool,
    #[serde(rename = "detectedType")]
    pub detected_kind: ImportKind,
    pub confidence_reason: String,
}

impl ColumnMapping {
    /// Hardcoded default used when the classifier is unavailable.
    pub fn fallback() -> Self {
        Self {
            from_index: 0,
            to_index: 1,
            value_index: 2,
            token_index: 3,
            timestamp_index: -1,
            hash_index: -1,
            method_index: -1,
            block_index: -1,
            fee_index: -1,
            has_header: true,
            detected_kind: ImportKind::Native,
            confidence_reason: "Classifier unavailable; falling back to default schema".to_string(),
        }
    }

    fn col<'a>(
        &self,
        row: &'a [String],
        index: i32,
    ) -> Option<&'a str> {
        if index < 0 {
            return None;
        }
        row.get(index as usize).map(String::as_str).filter(|s| !s.is_empty())
    }
}

fn coerce_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return Utc::now();
    };
    if let Ok(num) = raw.trim().parse::<i64>() {
        if num > 0 {
            // Heuristic from explorer exports: ten digits = unix seconds,
            // thirteen = milliseconds.
            let parsed = if num < 10_000_000_000 {
                DateTime::from_timestamp(num, 0)
            } else {
                DateTime::from_timestamp_millis(num)
            };
            if let Some(ts) = parsed {
                return ts;
            }
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return ts.with_timezone(&Utc);
    }
    Utc::now()
}

fn resolve_kind(
    mapping: &ColumnMapping,
    hint: ImportKind,
    token: Option<&str>,
) -> TxKind {
    match hint {
        ImportKind::Native => TxKind::Native,
        ImportKind::Erc20 => TxKind::Erc20,
        ImportKind::Mixed => match mapping.detected_kind {
            ImportKind::Mixed => {
                if token.is_some_and(|t| !t.is_empty()) {
                    TxKind::Erc20
                } else {
                    TxKind::Native
                }
            },
            ImportKind::Erc20 => TxKind::Erc20,
            ImportKind::Native => TxKind::Native,
        },
    }
}

/// Apply a column mapping to pre-split CSV rows. Rows with fewer than two
/// columns are skipped; every constructed record gets a fresh id and a
/// `Success` status, matching what explorer exports omit.
pub fn transactions_from_rows(
    mapping: &ColumnMapping,
    rows: &[Vec<String>],
    hint: ImportKind,
) -> Vec<Transaction> {
    let start = if mapping.has_header { 1 } else { 0 };

    rows.iter()
        .skip(start)
        .filter(|row| row.len() >= 2)
        .map(|row| {
            let value = mapping
                .col(row, mapping.value_index)
                .map(|v| v.replace(',', ""))
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0);

            let token = mapping.col(row, mapping.token_index).map(|t| t.to_uppercase());
            let kind = resolve_kind(mapping, hint, token.as_deref());

            let fee = if kind == TxKind::Native {
                Some(
                    mapping
                        .col(row, mapping.fee_index)
                        .and_then(|f| f.parse::<f64>().ok())
                        .unwrap_or(0.0),
                )
            } else {
                None
            };

            Transaction {
                id: Transaction::generate_id(),
                hash: mapping
                    .col(row, mapping.hash_index)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("0x{}...", Transaction::generate_id())),
                method: mapping
                    .col(row, mapping.method_index)
                    .unwrap_or("Transfer")
                    .to_string(),
                block: mapping
                    .col(row, mapping.block_index)
                    .and_then(|b| b.parse::<u64>().ok())
                    .unwrap_or(0),
                timestamp: coerce_timestamp(mapping.col(row, mapping.timestamp_index)),
                from: mapping.col(row, mapping.from_index).unwrap_or("0xUnknown").to_string(),
                to: mapping.col(row, mapping.to_index).unwrap_or("0xUnknown").to_string(),
                value,
                token: token.unwrap_or_else(|| {
                    if kind == TxKind::Native { "ETH".to_string() } else { "TOKEN".to_string() }
                }),
                fee,
                kind,
                status: TxStatus::Success,
            }
        })
        .collect()
}
