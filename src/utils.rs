// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS` or the
/// same with a `T` separator. A bare date means midnight. Sub-millisecond
/// precision is dropped.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(truncate_to_millis(dt));
        }
    }
    parse_date(s)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD[ HH:MM[:SS]]", s))
}

pub fn truncate_to_millis(dt: NaiveDateTime) -> NaiveDateTime {
    let nanos = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(nanos).unwrap_or(dt)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s.trim()))
}

/// Transaction amounts and balances as typed by a user: digits with an
/// optional `,` or `_` thousands separator.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    parse_decimal(&cleaned).with_context(|| format!("Invalid amount '{}'", s.trim()))
}

/// `1350000` -> `1,350,000`; fractional digits are kept as stored.
pub fn fmt_amount(d: &Decimal) -> String {
    let normalized = d.normalize();
    let raw = normalized.abs().to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (raw.clone(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn now_local() -> NaiveDateTime {
    truncate_to_millis(chrono::Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(fmt_amount(&Decimal::new(1_350_000, 0)), "1,350,000");
        assert_eq!(fmt_amount(&Decimal::new(999, 0)), "999");
        assert_eq!(fmt_amount(&Decimal::new(-150_000, 0)), "-150,000");
        assert_eq!(fmt_amount(&Decimal::new(123_456_789, 2)), "1,234,567.89");
        assert_eq!(fmt_amount(&Decimal::ZERO), "0");
    }

    #[test]
    fn bare_date_is_midnight() {
        let dt = parse_datetime("2026-10-09").unwrap();
        assert_eq!(dt.time(), NaiveTime::MIN);
        let dt = parse_datetime("2026-10-09 18:45").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "18:45");
    }

    #[test]
    fn amount_accepts_separators() {
        assert_eq!(parse_amount("1,000,000").unwrap(), Decimal::new(1_000_000, 0));
        assert!(parse_amount("ten").is_err());
    }
}
