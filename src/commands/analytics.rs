// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::load_workspace;
use crate::error::PlannerError;
use crate::models::Guest;
use crate::session::Session;
use crate::stats::{self, GroupStat};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde_json::json;

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let ws = load_workspace(session)?;
    let events = &ws.guests.events;
    let guests: Vec<&Guest> = ws.guests.guests.iter().collect();
    match m.subcommand() {
        Some(("overview", sub)) => {
            let o = stats::overview(events, &guests);
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &o)? {
                return Ok(());
            }
            let mut data = vec![
                vec!["Guests".to_string(), o.guests.to_string()],
                vec!["Avg Events/Guest".to_string(), format!("{:.1}", o.avg_events)],
                vec!["Attending All Events".to_string(), o.attending_all.to_string()],
                vec!["Multi-Event Guests".to_string(), o.multi_event.to_string()],
            ];
            data.extend(o.only.iter().map(|c| vec![format!("{} Only", c.event), c.attendees.to_string()]));
            println!("{}", pretty_table(&["Metric", "Value"], data));
        }
        Some(("overlap", sub)) => {
            let matrix = stats::overlap_matrix(events, &guests);
            let patterns = stats::attendance_patterns(events, &guests);
            if maybe_print_json(
                sub.get_flag("json"),
                sub.get_flag("jsonl"),
                &json!({ "events": events, "matrix": &matrix, "patterns": &patterns }),
            )? {
                return Ok(());
            }
            let mut headers: Vec<&str> = vec![""];
            headers.extend(events.iter().map(String::as_str));
            let data = events
                .iter()
                .zip(&matrix)
                .map(|(e, row)| {
                    let mut r = vec![e.clone()];
                    r.extend(row.iter().map(|n| n.to_string()));
                    r
                })
                .collect();
            println!("{}", pretty_table(&headers, data));
            let data = patterns
                .iter()
                .map(|p| {
                    let label = if p.events.is_empty() {
                        "(no events)".to_string()
                    } else if p.events.len() == 1 {
                        format!("{} only", p.events[0])
                    } else {
                        p.events.join(" + ")
                    };
                    vec![label, p.guests.to_string()]
                })
                .collect();
            println!("{}", pretty_table(&["Attendance Pattern", "Guests"], data));
        }
        Some(("sources", sub)) => {
            if !ws.guests.has_source {
                return Err(disabled("Source analysis", "Source"));
            }
            let rows = stats::source_breakdown(events, &guests);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                print_groups("Source", events, &rows);
            }
        }
        Some(("categories", sub)) => {
            if !ws.guests.has_category {
                return Err(disabled("Category analysis", "Category"));
            }
            let rows = stats::category_breakdown(events, &guests);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                print_groups("Category", events, &rows);
            }
        }
        _ => {}
    }
    Ok(())
}

fn disabled(feature: &'static str, column: &str) -> anyhow::Error {
    PlannerError::FeatureDisabled {
        feature,
        reason: format!("the guest roster has no '{}' column", column),
    }
    .into()
}

fn print_groups(key: &str, events: &[String], rows: &[GroupStat]) {
    let mut headers: Vec<&str> = vec![key, "Total"];
    headers.extend(events.iter().map(String::as_str));
    headers.push("Avg Events");
    let data = rows
        .iter()
        .map(|r| {
            let mut row = vec![r.key.clone(), r.total.to_string()];
            row.extend(r.per_event.iter().map(|n| n.to_string()));
            row.push(r.avg_events.to_string());
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
}
