use std::collections::HashSet;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Transaction;
use crate::model::TxKind;
use crate::utils::end_of_day;

/// Inclusive date window. The end date is widened to 23:59:59.999 so a
/// user-picked calendar day keeps its whole final day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn from_dates(
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            start: start.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc(),
            end: end_of_day(end),
        }
    }

    pub fn contains(
        &self,
        instant: DateTime<Utc>,
    ) -> bool {
        instant >= self.start && instant <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphFilter {
    pub kind: TxKind,
    pub range: Option<DateRange>,
    pub dust_threshold: Option<f64>,
    /// Token allow-set; only consulted when non-empty.
    pub tokens: Option<HashSet<String>>,
    /// Cross-address relationship view: prune one-hop dead ends.
    pub related_only: bool,
}

impl GraphFilter {
    pub fn for_kind(kind: TxKind) -> Self {
        Self {
            kind,
            range: None,
            dust_threshold: None,
            tokens: None,
            related_only: false,
        }
    }

    pub fn accepts(
        &self,
        tx: &Transaction,
    ) -> bool {
        if tx.kind != self.kind {
            return false;
        }
        if let Some(range) = &self.range {
            if !range.contains(tx.timestamp) {
                return false;
            }
        }
        if let Some(threshold) = self.dust_threshold {
            if threshold > 0.0 && tx.value < threshold {
                return false;
            }
        }
        if let Some(tokens) = &self.tokens {
            if !tokens.is_empty() && !tokens.contains(&tx.token) {
                return false;
            }
        }
        true
    }
}
