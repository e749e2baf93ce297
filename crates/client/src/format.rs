//! Display helpers for amounts and dates.
//!
//! Input that cannot be parsed is returned unchanged rather than rejected.
use chrono::{DateTime, NaiveDate};

use crate::money::Amount;

/// Formats decimal text as US dollars, e.g. `"1234.5"` → `"$1,234.50"`.
pub fn format_amount(amount: &str) -> String {
    match amount.parse::<Amount>() {
        Ok(amount) => format_amount_cents(amount.cents()),
        Err(_) => amount.to_string(),
    }
}

pub fn format_amount_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", group_thousands(abs / 100), abs % 100)
}

/// Formats an RFC3339 timestamp or `YYYY-MM-DD` date as `"February 12, 2025"`.
pub fn format_date(date: &str) -> String {
    let trimmed = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.format("%B %-d, %Y").to_string();
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
