use chrono::DateTime;
use chrono::NaiveDate;
use chrono::TimeZone;
use chrono::Utc;

/// Lowercase an address for comparison; storage keeps the original casing.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Shorten an address for log lines and summaries: `0xab12...cd34`.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}

/// Human-scale amount formatting with K/M suffixes.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.2}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.2}K", amount / 1_000.0)
    } else {
        format!("{:.2}", amount)
    }
}

/// Extend a calendar date to the last representable instant of that day.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999 exists for every calendar date.
    let eod = date.and_hms_milli_opt(23, 59, 59, 999).expect("valid time of day");
    Utc.from_utc_datetime(&eod)
}

/// Age of a timestamp relative to `now`, in the coarsest sensible unit.
pub fn age_since(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds().max(0);
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    format!("{}d", hours / 24)
}
