// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Table assignment: random striping, category grouping, manual edits and
//! the per-table layout view.

use crate::error::PlannerError;
use crate::models::{Table, TableConfig};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub type Assignments = BTreeMap<String, u32>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Arrangement {
    pub assignments: Assignments,
    /// Guests left over once every seat is taken, in placement order.
    pub unassigned: Vec<String>,
}

/// Shuffle, then fill table 1 to capacity, then table 2, and so on.
pub fn arrange_random<R: Rng + ?Sized>(guests: &[String], cfg: &TableConfig, rng: &mut R) -> Arrangement {
    let mut order: Vec<&String> = guests.iter().collect();
    order.shuffle(rng);

    let seats = cfg.seats_per_table.max(1) as usize;
    let capacity = cfg.total_capacity() as usize;
    let mut out = Arrangement::default();
    for (i, name) in order.into_iter().enumerate() {
        if i < capacity {
            out.assignments.insert(name.clone(), (i / seats) as u32 + 1);
        } else {
            out.unassigned.push(name.clone());
        }
    }
    out
}

/// Keep each category together where it fits.
///
/// Categories go largest first (ties by name). A category that fits in the
/// remaining space of some table is placed whole in the earliest such table;
/// a larger one spills across the earliest tables with free seats.
pub fn arrange_by_category(guests: &[(String, String)], cfg: &TableConfig) -> Arrangement {
    let mut groups: HashMap<&str, Vec<&String>> = HashMap::new();
    for (name, category) in guests {
        groups.entry(category.as_str()).or_default().push(name);
    }
    let mut ordered: Vec<(&str, Vec<&String>)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    let mut free: Vec<usize> = vec![cfg.seats_per_table as usize; cfg.num_tables as usize];
    let mut out = Arrangement::default();

    for (category, members) in ordered {
        if let Some(t) = free.iter().position(|&f| f >= members.len()) {
            free[t] -= members.len();
            for name in members {
                out.assignments.insert(name.clone(), t as u32 + 1);
            }
            continue;
        }
        tracing::debug!(category, size = members.len(), "category split across tables");
        let mut remaining = members.into_iter();
        'tables: for (t, slots) in free.iter_mut().enumerate() {
            while *slots > 0 {
                let Some(name) = remaining.next() else {
                    break 'tables;
                };
                out.assignments.insert(name.clone(), t as u32 + 1);
                *slots -= 1;
            }
        }
        out.unassigned.extend(remaining.cloned());
    }
    out
}

/// Direct (guest, table) edit. Capacity is not checked; the layout view
/// reports overflow.
pub fn assign(assignments: &mut Assignments, guest: &str, table: u32, cfg: &TableConfig) -> Result<Option<u32>, PlannerError> {
    if table == 0 || table > cfg.num_tables {
        return Err(PlannerError::TableOutOfRange {
            table,
            max: cfg.num_tables,
        });
    }
    Ok(assignments.insert(guest.to_string(), table))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub tables: Vec<Table>,
    /// Assignments pointing past the configured table count.
    pub out_of_range: Vec<(String, u32)>,
}

pub fn layout(assignments: &Assignments, cfg: &TableConfig) -> Layout {
    let mut tables: Vec<Table> = (1..=cfg.num_tables)
        .map(|id| Table {
            id,
            capacity: cfg.seats_per_table,
            guests: Vec::new(),
        })
        .collect();
    let mut out_of_range = Vec::new();
    // BTreeMap iteration keeps each table's guests sorted by name.
    for (guest, &table) in assignments {
        match tables.get_mut((table as usize).wrapping_sub(1)) {
            Some(t) => t.guests.push(guest.clone()),
            _ => out_of_range.push((guest.clone(), table)),
        }
    }
    Layout {
        tables,
        out_of_range,
    }
}
