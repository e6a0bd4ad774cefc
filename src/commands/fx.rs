// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::{
    self, Currency, RATE_ENDPOINTS, RateSnapshot, RateTable, convert_between, fetch_latest,
    resolve_rates,
};
use crate::loader::{self, classify_country, currency_for_file, file_token};
use crate::session::Session;
use crate::utils::{http_client, maybe_print_json, parse_decimal, pretty_table, required};
use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::json;
use std::path::Path;
use std::str::FromStr;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// Original price column → converted column, per file currency.
const CONVERSIONS: &[(Currency, &str, &str)] = &[
    (Currency::Gbp, "Published Venue Hire / Package (GBP)", "Published Venue Hire / Package (USD)"),
    (Currency::Gbp, "Per_Head/Menu From (GBP)", "Per_Head/Menu From (USD)"),
    (Currency::Gbp, "Per-Head / Menu From (GBP)", "Per-Head / Menu From (USD)"),
    (Currency::Gbp, "Base Price (£)", "Base Price (USD)"),
    (Currency::Gbp, "Price per Guest (£)", "Price per Guest (USD)"),
    (Currency::Eur, "Published Pricing", "Published Pricing (USD)"),
    (Currency::Eur, "Base Price (€)", "Base Price (USD)"),
    (Currency::Eur, "Price per Guest (€)", "Price per Guest (USD)"),
    (Currency::Usd, "Published Venue Hire / Package (GBP)", "Published Venue Hire / Package (USD)"),
    (Currency::Usd, "Per-Head / Menu From (GBP)", "Per-Head / Menu From (USD)"),
    (Currency::Usd, "Base Price ($)", "Base Price (USD)"),
    (Currency::Usd, "Price per Guest ($)", "Price per Guest (USD)"),
];

/// What one file pass changed: converted column name and filled cell count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRefresh {
    pub currency: Option<Currency>,
    pub columns: Vec<(String, usize)>,
}

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("refresh", sub)) => refresh(session, sub)?,
        Some(("rates", sub)) => rates(session, sub)?,
        Some(("convert", sub)) => {
            let amount = parse_decimal(required(sub, "amount")?)?;
            let from = Currency::from_str(required(sub, "from")?)?;
            let to = Currency::from_str(required(sub, "to")?)?;
            let table = fx::load_snapshot(&session.data_dir())?
                .map(|s| RateTable::from_snapshot(&s))
                .unwrap_or_default();
            let out = convert_between(amount, from, to, &table).round_dp(2);
            println!("{:.2} {} = {:.2} {}", amount, from, out, to);
        }
        _ => {}
    }
    Ok(())
}

/// First number in a price cell, ignoring symbols and thousands separators.
pub fn first_number(cell: &str) -> Option<Decimal> {
    let cleaned = cell.replace(',', "");
    NUMBER_RE
        .find(&cleaned)
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
}

/// Rewrite the `(USD)` columns of one venue file in place, keeping its encoding.
pub fn refresh_file(path: &Path, snap: &RateSnapshot) -> Result<FileRefresh> {
    let mut table = loader::read_table(path)?;
    let country = classify_country(&file_token(path));
    let currency = currency_for_file(&country, &table.headers);
    let rate = snap.rate(currency);

    let mut report = FileRefresh {
        currency: Some(currency),
        columns: Vec::new(),
    };
    for (ccy, original, target) in CONVERSIONS {
        if *ccy != currency {
            continue;
        }
        let Some(src) = table.column(original) else {
            continue;
        };
        let dst = table.ensure_column(target);
        let mut filled = 0;
        for row in 0..table.rows.len() {
            let value = table
                .cell(row, Some(src))
                .and_then(first_number)
                .and_then(|n| n.checked_mul(rate))
                .map(|v| v.round_dp(2));
            if value.is_some() {
                filled += 1;
            }
            table.set(row, dst, value.map(|v| v.to_string()).unwrap_or_default());
        }
        tracing::debug!(file = %path.display(), column = *original, filled, "converted");
        report.columns.push((target.to_string(), filled));
    }
    if !report.columns.is_empty() {
        loader::write_table(path, &table)?;
    }
    Ok(report)
}

fn refresh(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let dir = session.data_dir();
    let now = Utc::now();
    let snap = if sub.get_flag("offline") {
        RateSnapshot::fallback(now)
    } else {
        let client = http_client()?;
        resolve_rates(&RATE_ENDPOINTS, now, |url| fetch_latest(&client, url))
    };
    println!("Rates from {} (as of {})", snap.source, snap.as_of);
    println!("  1 GBP = ${:.4} USD", snap.gbp_to_usd);
    println!("  1 EUR = ${:.4} USD", snap.eur_to_usd);
    fx::save_snapshot(&dir, &snap)?;

    let files = loader::discover_venue_files(&dir)?;
    if files.is_empty() {
        println!("No venue files (*{}) in {}", loader::VENUE_SUFFIX, dir.display());
    }
    for path in files {
        let report = refresh_file(&path, &snap)
            .with_context(|| format!("Refresh {}", path.display()))?;
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        if report.columns.is_empty() {
            println!("{}: no known price columns", name);
            continue;
        }
        for (col, filled) in &report.columns {
            println!("{}: {} ← {} values", name, col, filled);
        }
    }
    Ok(())
}

fn rates(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let snap = fx::load_snapshot(&session.data_dir())?;
    let table = snap.as_ref().map(RateTable::from_snapshot).unwrap_or_default();
    let (source, as_of) = match &snap {
        Some(s) => (s.source.to_string(), s.as_of.clone()),
        None => ("hardcoded fallback".to_string(), "n/a".to_string()),
    };
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({
            "source": source,
            "as_of": as_of,
            "GBP": table.rate(Currency::Gbp),
            "EUR": table.rate(Currency::Eur),
            "USD": table.rate(Currency::Usd),
        }),
    )? {
        return Ok(());
    }
    let data = [Currency::Gbp, Currency::Eur, Currency::Usd]
        .iter()
        .map(|c| vec![c.code().to_string(), format!("{:.4}", table.rate(*c))])
        .collect();
    println!("{}", pretty_table(&["Currency", "→ USD"], data));
    println!("source: {} (as of {})", source, as_of);
    Ok(())
}
