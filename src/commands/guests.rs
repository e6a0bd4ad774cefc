// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::seating::current_assignments;
use super::{guest_filter, load_workspace};
use crate::error::PlannerError;
use crate::filters::GuestFilter;
use crate::models::{Guest, GuestList};
use crate::session::Session;
use crate::stats;
use crate::utils::{fmt_opt, maybe_print_json, pretty_table};
use anyhow::Result;
use serde_json::{Value, json};

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, sub)?,
        Some(("stats", sub)) => guest_stats(session, sub)?,
        _ => {}
    }
    Ok(())
}

/// Apply a filter, refusing category filters when the roster has no categories.
pub fn filtered<'a>(list: &'a GuestList, filter: &GuestFilter) -> Result<Vec<&'a Guest>> {
    if !filter.categories.is_empty() && !list.has_category {
        return Err(PlannerError::FeatureDisabled {
            feature: "Category filter",
            reason: "the guest roster has no 'Category' column".into(),
        }
        .into());
    }
    Ok(filter.apply(list)?)
}

pub fn guest_json(list: &GuestList, g: &Guest) -> Value {
    let events: serde_json::Map<String, Value> = list
        .events
        .iter()
        .enumerate()
        .map(|(i, e)| (e.clone(), Value::Bool(g.attends(i))))
        .collect();
    json!({
        "name": g.name,
        "category": g.category,
        "source": g.source,
        "events": events,
        "total_events": g.total_events,
        "table": g.table,
    })
}

fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let guests = filtered(&ws.guests, &guest_filter(sub))?;
    let rows: Vec<Value> = guests.iter().map(|g| guest_json(&ws.guests, g)).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }

    let mut headers: Vec<&str> = vec!["Name", "Category", "Source"];
    headers.extend(ws.guests.events.iter().map(String::as_str));
    headers.extend(["Total Events", "Table"]);
    let seats = current_assignments(session, &ws);
    let mut data = Vec::new();
    for g in &guests {
        let mut row = vec![g.name.clone(), g.category.clone(), g.source.clone()];
        for i in 0..ws.guests.events.len() {
            row.push(if g.attends(i) { "✓".into() } else { String::new() });
        }
        row.push(g.total_events.to_string());
        row.push(fmt_opt(seats.get(&g.name).copied()));
        data.push(row);
    }
    println!("{}", pretty_table(&headers, data));
    println!("{} guests", guests.len());
    Ok(())
}

fn guest_stats(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let guests = filtered(&ws.guests, &guest_filter(sub))?;
    let heads = stats::event_headcounts(&ws.guests.events, &guests);
    let cats = stats::category_counts(&guests);
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({ "total": guests.len(), "events": heads, "categories": cats }),
    )? {
        return Ok(());
    }

    let mut data = vec![vec!["Total Guests".to_string(), guests.len().to_string()]];
    data.extend(heads.iter().map(|h| vec![h.event.clone(), h.attendees.to_string()]));
    println!("{}", pretty_table(&["Metric", "Guests"], data));
    if ws.guests.has_category {
        let data = cats.into_iter().map(|(c, n)| vec![c, n.to_string()]).collect();
        println!("{}", pretty_table(&["Category", "Guests"], data));
    }
    Ok(())
}
