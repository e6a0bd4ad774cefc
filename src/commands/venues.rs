// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load_workspace, venue_filter};
use crate::fx::Currency;
use crate::session::Session;
use crate::stats;
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, pretty_table, required, strings};
use anyhow::Result;
use rust_decimal::Decimal;
use serde_json::json;

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, sub)?,
        Some(("show", sub)) => show(session, sub)?,
        Some(("cost", sub)) => cost(session, sub)?,
        Some(("compare", sub)) => compare(session, sub)?,
        Some(("scenarios", sub)) => scenarios(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let filter = venue_filter(sub)?;
    let venues = filter.apply(&ws.venues);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &venues)? {
        return Ok(());
    }

    let n = venues.len();
    let countries = stats::country_stats(&venues).len();
    let caps: Vec<u32> = venues.iter().filter_map(|v| v.seated_capacity).collect();
    let mut data = Vec::new();
    for v in &venues {
        data.push(vec![
            v.name.clone(),
            v.country.clone(),
            v.style.clone(),
            fmt_opt(v.seated_capacity),
            fmt_money(v.base_price_usd, Currency::Usd),
            fmt_money(v.per_guest_usd, Currency::Usd),
            v.exclusive_use.clone().unwrap_or_default(),
            v.bedrooms.clone().unwrap_or_default(),
            v.airports.clone().unwrap_or_default(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &[
                "Venue", "Country", "Style", "Seated", "Base (USD)", "Per Guest (USD)", "Exclusive Use?",
                "Bedrooms", "Airports"
            ],
            data
        )
    );
    let total_base: Decimal = venues.iter().map(|v| v.base_price_usd).sum();
    let avg = if n == 0 {
        "N/A".to_string()
    } else {
        fmt_money(total_base / Decimal::from(n), Currency::Usd)
    };
    let avg_cap = if caps.is_empty() {
        "N/A".to_string()
    } else {
        format!("{:.0}", caps.iter().map(|&c| u64::from(c)).sum::<u64>() as f64 / caps.len() as f64)
    };
    println!(
        "{} venues across {} countries · average base {} · average seated capacity {}",
        n,
        countries,
        avg,
        avg_cap
    );
    Ok(())
}

fn show(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let v = ws.venue(required(sub, "name")?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), v)? {
        return Ok(());
    }
    let ccy = v.currency;
    let rows = vec![
        vec!["Venue".into(), v.name.clone()],
        vec!["Country".into(), v.country.clone()],
        vec!["Style".into(), v.style.clone()],
        vec!["Seated capacity".into(), fmt_opt(v.seated_capacity)],
        vec!["Reception capacity".into(), fmt_opt(v.reception_capacity)],
        vec!["Hire / package text".into(), v.hire_text.clone().unwrap_or_default()],
        vec!["Per-head text".into(), v.per_head_text.clone().unwrap_or_default()],
        vec![
            format!("Base price ({})", ccy),
            format!("{} ({})", fmt_money(v.price.base, ccy), v.price.base_source),
        ],
        vec![
            format!("Per guest ({})", ccy),
            format!("{} ({})", fmt_money(v.price.per_guest, ccy), v.price.per_guest_source),
        ],
        vec!["Base price (USD)".into(), fmt_money(v.base_price_usd, Currency::Usd)],
        vec!["Per guest (USD)".into(), fmt_money(v.per_guest_usd, Currency::Usd)],
        vec!["Pricing source".into(), v.pricing_url.clone().unwrap_or_default()],
        vec!["Website".into(), v.website.clone().unwrap_or_default()],
        vec!["File".into(), v.source_file.clone()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn cost(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let v = ws.venue(required(sub, "name")?)?;
    let guests = *sub.get_one::<u32>("guests").unwrap_or(&150);
    let b = stats::cost_breakdown(v, guests);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &b)? {
        return Ok(());
    }
    let usd = Currency::Usd;
    let rows = vec![
        vec!["Base Venue Fee".into(), fmt_money(b.base, usd)],
        vec![
            "Per Guest Cost".into(),
            format!(
                "{} ({} × {})",
                fmt_money(b.guests_cost, usd),
                b.guests,
                fmt_money(b.per_guest, usd)
            ),
        ],
        vec!["Total".into(), fmt_money(b.total, usd)],
    ];
    println!("{}", pretty_table(&["Item", "Cost"], rows));
    Ok(())
}

fn compare(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let venues = venue_filter(sub)?.apply(&ws.venues);
    let rows = stats::country_stats(&venues);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let usd = Currency::Usd;
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.country.clone(),
                r.venues.to_string(),
                fmt_money(r.avg_base, usd),
                fmt_money(r.min_base, usd),
                fmt_money(r.max_base, usd),
                r.avg_capacity
                    .map(|c| c.round_dp(0).to_string())
                    .unwrap_or_else(|| "N/A".into()),
                fmt_money(r.avg_per_guest, usd),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Country", "Count", "Avg Price", "Min Price", "Max Price", "Avg Capacity", "Avg Per Guest"],
            data
        )
    );
    Ok(())
}

fn scenarios(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let guests = *sub.get_one::<u32>("guests").unwrap_or(&150);
    let venues: Vec<_> = ws.venues.iter().collect();
    let mut countries = strings(sub, "country");
    if countries.is_empty() {
        countries = stats::country_stats(&venues).into_iter().map(|c| c.country).collect();
    }
    let rows = stats::budget_scenarios(&venues, &countries, guests);
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({ "guests": guests, "scenarios": &rows }),
    )? {
        return Ok(());
    }
    let usd = Currency::Usd;
    let data = rows
        .iter()
        .map(|s| {
            vec![
                s.country.clone(),
                fmt_money(s.minimum, usd),
                fmt_money(s.average, usd),
                fmt_money(s.maximum, usd),
            ]
        })
        .collect();
    println!("Cost scenarios for {} guests", guests);
    println!("{}", pretty_table(&["Country", "Minimum", "Average", "Maximum"], data));
    Ok(())
}
