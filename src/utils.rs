// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::Currency;
use crate::loader::Workspace;
use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "vowboard/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/vowboard)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .replace(',', "")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// `£19,710` style, whole units.
pub fn fmt_money(d: Decimal, ccy: Currency) -> String {
    let rounded = d.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}{}", sign, ccy.symbol(), grouped)
}

pub fn fmt_opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "N/A".to_string())
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

pub fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    m.get_one::<String>(id)
        .ok_or_else(|| anyhow!("missing required argument '{}'", id))
}

pub fn strings(m: &clap::ArgMatches, id: &str) -> Vec<String> {
    m.get_many::<String>(id)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}

/// Schema warnings go to stderr so piped JSON stays clean.
pub fn print_warnings(ws: &Workspace) {
    for w in &ws.warnings {
        eprintln!("warning: {}", w);
    }
}

/// `seating_chart_20250614.csv`
pub fn dated_filename(stem: &str, ext: &str) -> String {
    format!("{}_{}.{}", stem, chrono::Local::now().format("%Y%m%d"), ext)
}
