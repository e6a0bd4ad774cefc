// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::guests::{filtered, guest_json};
use super::seating::{current_assignments, working_set};
use super::{guest_filter, load_workspace, venue_filter};
use crate::session::Session;
use crate::utils::dated_filename;
use anyhow::{Result, bail};
use serde_json::{Value, json};
use std::collections::HashMap;

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("guests", sub)) => export_guests(session, sub),
        Some(("venues", sub)) => export_venues(session, sub),
        Some(("seating", sub)) => export_seating(session, sub),
        _ => Ok(()),
    }
}

/// Validated format plus the output path (dated default when `--out` is absent).
fn target(sub: &clap::ArgMatches, stem: &str) -> Result<(String, String)> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let out = sub
        .get_one::<String>("out")
        .cloned()
        .unwrap_or_else(|| dated_filename(stem, &fmt));
    Ok((fmt, out))
}

fn write_rows(fmt: &str, out: &str, headers: &[String], rows: Vec<Vec<String>>, items: &[Value]) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(headers)?;
            for row in rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        _ => std::fs::write(out, serde_json::to_string_pretty(items)?)?,
    }
    Ok(())
}

fn export_guests(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub, "guest_list")?;
    let ws = load_workspace(session)?;
    let guests = filtered(&ws.guests, &guest_filter(sub))?;

    let mut headers: Vec<String> = vec!["Name".into(), "Category".into(), "Source".into()];
    headers.extend(ws.guests.events.iter().cloned());
    headers.push("Total Events".into());
    let rows = guests
        .iter()
        .map(|g| {
            let mut row = vec![g.name.clone(), g.category.clone(), g.source.clone()];
            row.extend((0..ws.guests.events.len()).map(|i| if g.attends(i) { "1" } else { "0" }.to_string()));
            row.push(g.total_events.to_string());
            row
        })
        .collect();
    let items: Vec<Value> = guests.iter().map(|g| guest_json(&ws.guests, g)).collect();
    write_rows(&fmt, &out, &headers, rows, &items)?;
    println!("Exported {} guests to {}", guests.len(), out);
    Ok(())
}

fn export_venues(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub, "venues")?;
    let ws = load_workspace(session)?;
    let venues = venue_filter(sub)?.apply(&ws.venues);

    let headers: Vec<String> = [
        "Venue",
        "Country",
        "Style",
        "Seated Capacity",
        "Reception Capacity",
        "Currency",
        "Base Price",
        "Price per Guest",
        "Base Price (USD)",
        "Price per Guest (USD)",
        "Price Source",
        "Pricing Source URL(s)",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    let rows = venues
        .iter()
        .map(|v| {
            vec![
                v.name.clone(),
                v.country.clone(),
                v.style.clone(),
                v.seated_capacity.map(|c| c.to_string()).unwrap_or_default(),
                v.reception_capacity.map(|c| c.to_string()).unwrap_or_default(),
                v.currency.to_string(),
                v.price.base.to_string(),
                v.price.per_guest.to_string(),
                v.base_price_usd.to_string(),
                v.per_guest_usd.to_string(),
                format!("{}/{}", v.price.base_source, v.price.per_guest_source),
                v.pricing_url.clone().unwrap_or_default(),
            ]
        })
        .collect();
    let items: Vec<Value> = venues.iter().map(|v| json!(v)).collect();
    write_rows(&fmt, &out, &headers, rows, &items)?;
    println!("Exported {} venues to {}", venues.len(), out);
    Ok(())
}

fn export_seating(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub, "seating_chart")?;
    let ws = load_workspace(session)?;
    let working: HashMap<&str, _> = working_set(session, &ws)
        .into_iter()
        .map(|g| (g.name.as_str(), g))
        .collect();

    // Only guests still in the seated working set make the chart.
    let mut chart: Vec<(u32, &str, &str, &str)> = current_assignments(session, &ws)
        .iter()
        .filter_map(|(name, table)| {
            working
                .get(name.as_str())
                .map(|g| (*table, g.name.as_str(), g.category.as_str(), g.source.as_str()))
        })
        .collect();
    chart.sort();

    let headers: Vec<String> = ["Table", "Guest Name", "Category", "Source"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = chart
        .iter()
        .map(|(t, n, c, s)| vec![t.to_string(), n.to_string(), c.to_string(), s.to_string()])
        .collect();
    let items: Vec<Value> = chart
        .iter()
        .map(|(t, n, c, s)| json!({ "table": t, "guest": n, "category": c, "source": s }))
        .collect();
    write_rows(&fmt, &out, &headers, rows, &items)?;
    println!("Exported {} seats to {}", chart.len(), out);
    Ok(())
}
