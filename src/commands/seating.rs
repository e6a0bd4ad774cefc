// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_workspace;
use crate::error::PlannerError;
use crate::loader::Workspace;
use crate::models::{Guest, Occupancy};
use crate::seating::{self, Assignments};
use crate::session::Session;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("config", sub)) => config(session, sub)?,
        Some(("arrange", sub)) => arrange(session, sub)?,
        Some(("assign", sub)) => assign(session, sub)?,
        Some(("unassign", sub)) => {
            let guest = required(sub, "guest")?;
            let ws = load_workspace(session)?;
            let seats = session.assignments.get_or_insert_with(|| roster_tables(&ws));
            match seats.remove(guest) {
                Some(t) => println!("Removed {} from table {}", guest, t),
                None => println!("{} had no table", guest),
            }
        }
        Some(("reset", _)) => {
            let ws = load_workspace(session)?;
            let n = current_assignments(session, &ws).len();
            session.assignments = Some(Assignments::new());
            println!("Cleared {} assignments", n);
        }
        Some(("show", sub)) => show(session, sub)?,
        _ => {}
    }
    Ok(())
}

/// Guests being seated: attendees of the configured event, or everyone when
/// the roster has no such event.
pub fn working_set<'a>(session: &Session, ws: &'a Workspace) -> Vec<&'a Guest> {
    let idx = session
        .tables
        .event
        .as_deref()
        .and_then(|e| ws.guests.event_index(e));
    ws.guests
        .guests
        .iter()
        .filter(|g| idx.is_none_or(|i| g.attends(i)))
        .collect()
}

/// Session assignments, or the roster's own `Table` column before the first edit.
pub fn current_assignments(session: &Session, ws: &Workspace) -> Assignments {
    match &session.assignments {
        Some(a) => a.clone(),
        None => roster_tables(ws),
    }
}

fn roster_tables(ws: &Workspace) -> Assignments {
    ws.guests
        .guests
        .iter()
        .filter_map(|g| g.table.map(|t| (g.name.clone(), t)))
        .collect()
}

fn config(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(n) = sub.get_one::<u32>("tables") {
        session.tables.num_tables = *n;
    }
    if let Some(n) = sub.get_one::<u32>("seats") {
        session.tables.seats_per_table = *n;
    }
    if let Some(e) = sub.get_one::<String>("event") {
        session.tables.event = Some(e.clone());
    }
    if sub.get_flag("all-guests") {
        session.tables.event = None;
    }
    let cfg = &session.tables;
    println!(
        "{} tables × {} seats = {} seats; seating {}",
        cfg.num_tables,
        cfg.seats_per_table,
        cfg.total_capacity(),
        cfg.event.as_deref().map_or("all guests".to_string(), |e| format!("{} guests", e))
    );
    let stale = session
        .assignments
        .iter()
        .flat_map(|a| a.values())
        .filter(|t| **t > cfg.num_tables)
        .count();
    if stale > 0 {
        println!("{} existing assignments point past table {}; run `seating reset` or reassign them", stale, cfg.num_tables);
    }
    Ok(())
}

fn arrange(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let guests = working_set(session, &ws);
    let policy = sub.get_one::<String>("policy").map(String::as_str).unwrap_or("random");
    let arrangement = match policy {
        "category" => {
            if !ws.guests.has_category {
                return Err(PlannerError::FeatureDisabled {
                    feature: "Category grouping",
                    reason: "the guest roster has no 'Category' column".into(),
                }
                .into());
            }
            let pairs: Vec<(String, String)> = guests
                .iter()
                .map(|g| (g.name.clone(), g.category.clone()))
                .collect();
            seating::arrange_by_category(&pairs, &session.tables)
        }
        _ => {
            let names: Vec<String> = guests.iter().map(|g| g.name.clone()).collect();
            let mut rng = match sub.get_one::<u64>("seed") {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };
            seating::arrange_random(&names, &session.tables, &mut rng)
        }
    };
    tracing::info!(policy, seated = arrangement.assignments.len(), unassigned = arrangement.unassigned.len(), "auto-arranged");
    println!(
        "Seated {} of {} guests across {} tables ({} policy)",
        arrangement.assignments.len(),
        guests.len(),
        session.tables.num_tables,
        policy
    );
    if !arrangement.unassigned.is_empty() {
        println!(
            "{} guests without a seat: {}",
            arrangement.unassigned.len(),
            arrangement.unassigned.join(", ")
        );
    }
    session.assignments = Some(arrangement.assignments);
    Ok(())
}

fn assign(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let guest = required(sub, "guest")?;
    let table = *sub
        .get_one::<u32>("table")
        .ok_or_else(|| anyhow::anyhow!("missing required argument 'table'"))?;
    let ws = load_workspace(session)?;
    if ws.guests.find(guest).is_none() {
        return Err(PlannerError::NotFound {
            entity_type: "Guest",
            identifier: guest.clone(),
        }
        .into());
    }
    let seats = session.assignments.get_or_insert_with(|| roster_tables(&ws));
    let previous = seating::assign(seats, guest, table, &session.tables)?;
    match previous {
        Some(p) if p != table => println!("Moved {} from table {} to table {}", guest, p, table),
        _ => println!("Assigned {} to table {}", guest, table),
    }
    let seated = seats.values().filter(|t| **t == table).count() as u32;
    if seated > session.tables.seats_per_table {
        println!(
            "warning: table {} now has {}/{} seats filled",
            table, seated, session.tables.seats_per_table
        );
    }
    Ok(())
}

fn show(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let cfg = &session.tables;
    let assignments = current_assignments(session, &ws);
    let layout = seating::layout(&assignments, cfg);
    let working = working_set(session, &ws);
    let unseated: Vec<&str> = working
        .iter()
        .filter(|g| !assignments.contains_key(&g.name))
        .map(|g| g.name.as_str())
        .collect();

    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({
            "config": cfg,
            "tables": &layout.tables,
            "out_of_range": &layout.out_of_range,
            "unseated": &unseated,
        }),
    )? {
        return Ok(());
    }

    let total = cfg.total_capacity() as usize;
    if working.len() > total {
        println!("Total capacity {}: need {} more seats!", total, working.len() - total);
    } else {
        println!("Total capacity {}: {} spare seats", total, total - working.len());
    }
    let data = layout
        .tables
        .iter()
        .map(|t| {
            let status = match t.occupancy() {
                Occupancy::Empty => "empty",
                Occupancy::Partial => "partial",
                Occupancy::Full => "full",
                Occupancy::Overflow => "OVERFLOW",
            };
            vec![
                t.id.to_string(),
                status.to_string(),
                format!("{}/{}", t.guests.len(), t.capacity),
                t.guests.join("\n"),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Table", "Status", "Seats", "Guests"], data));
    for (guest, table) in &layout.out_of_range {
        println!("warning: {} is assigned to table {}, which is not configured", guest, table);
    }
    if !unseated.is_empty() {
        println!("{} guests without a seat: {}", unseated.len(), unseated.join(", "));
    }
    Ok(())
}
