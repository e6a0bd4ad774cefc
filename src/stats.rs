// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregates over guest and venue sets.

use crate::models::{Guest, Venue};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCount {
    pub event: String,
    pub attendees: usize,
}

pub fn event_headcounts(events: &[String], guests: &[&Guest]) -> Vec<EventCount> {
    events
        .iter()
        .enumerate()
        .map(|(i, e)| EventCount {
            event: e.clone(),
            attendees: guests.iter().filter(|g| g.attends(i)).count(),
        })
        .collect()
}

/// Sorted by descending count, then name.
pub fn category_counts(guests: &[&Guest]) -> Vec<(String, usize)> {
    sorted_counts(guests.iter().map(|g| g.category.as_str()))
}

pub fn source_counts(guests: &[&Guest]) -> Vec<(String, usize)> {
    sorted_counts(guests.iter().map(|g| g.source.as_str()))
}

fn sorted_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut agg: BTreeMap<&str, usize> = BTreeMap::new();
    for k in keys {
        *agg.entry(k).or_insert(0) += 1;
    }
    let mut items: Vec<(String, usize)> = agg.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub key: String,
    pub total: usize,
    pub per_event: Vec<usize>,
    pub avg_events: Decimal,
}

pub fn category_breakdown(events: &[String], guests: &[&Guest]) -> Vec<GroupStat> {
    group_stats(events, guests, |g| g.category.as_str())
}

pub fn source_breakdown(events: &[String], guests: &[&Guest]) -> Vec<GroupStat> {
    group_stats(events, guests, |g| g.source.as_str())
}

fn group_stats<'a, F>(events: &[String], guests: &[&'a Guest], key: F) -> Vec<GroupStat>
where
    F: Fn(&'a Guest) -> &'a str,
{
    let mut groups: BTreeMap<&str, Vec<&Guest>> = BTreeMap::new();
    for &g in guests {
        groups.entry(key(g)).or_default().push(g);
    }
    let mut out: Vec<GroupStat> = groups
        .into_iter()
        .map(|(k, members)| {
            let events_sum: u32 = members.iter().map(|g| g.total_events).sum();
            GroupStat {
                key: k.to_string(),
                total: members.len(),
                per_event: (0..events.len())
                    .map(|i| members.iter().filter(|g| g.attends(i)).count())
                    .collect(),
                avg_events: mean(Decimal::from(events_sum), members.len()),
            }
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    out
}

/// `matrix[i][j]` counts guests attending both event i and event j.
pub fn overlap_matrix(events: &[String], guests: &[&Guest]) -> Vec<Vec<usize>> {
    (0..events.len())
        .map(|i| {
            (0..events.len())
                .map(|j| guests.iter().filter(|g| g.attends(i) && g.attends(j)).count())
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub events: Vec<String>,
    pub guests: usize,
}

/// Exact attendance patterns ("Wedding only", "all three", ...), most common first.
pub fn attendance_patterns(events: &[String], guests: &[&Guest]) -> Vec<Pattern> {
    let mut agg: BTreeMap<Vec<bool>, usize> = BTreeMap::new();
    for g in guests {
        let key: Vec<bool> = (0..events.len()).map(|i| g.attends(i)).collect();
        *agg.entry(key).or_insert(0) += 1;
    }
    let mut out: Vec<Pattern> = agg
        .into_iter()
        .map(|(mask, n)| Pattern {
            events: events
                .iter()
                .zip(mask)
                .filter_map(|(e, on)| on.then(|| e.clone()))
                .collect(),
            guests: n,
        })
        .collect();
    out.sort_by(|a, b| b.guests.cmp(&a.guests).then_with(|| a.events.cmp(&b.events)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub guests: usize,
    pub avg_events: Decimal,
    pub attending_all: usize,
    pub multi_event: usize,
    /// Guests whose only event is this one.
    pub only: Vec<EventCount>,
}

pub fn overview(events: &[String], guests: &[&Guest]) -> Overview {
    let events_sum: u32 = guests.iter().map(|g| g.total_events).sum();
    let attending_all = if events.is_empty() {
        0
    } else {
        guests
            .iter()
            .filter(|g| (0..events.len()).all(|i| g.attends(i)))
            .count()
    };
    Overview {
        guests: guests.len(),
        avg_events: mean(Decimal::from(events_sum), guests.len()),
        attending_all,
        multi_event: guests.iter().filter(|g| g.total_events > 1).count(),
        only: events
            .iter()
            .enumerate()
            .map(|(i, e)| EventCount {
                event: e.clone(),
                attendees: guests
                    .iter()
                    .filter(|g| g.attends(i) && g.total_events == 1)
                    .count(),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStat {
    pub country: String,
    pub venues: usize,
    pub avg_base: Decimal,
    pub min_base: Decimal,
    pub max_base: Decimal,
    pub avg_capacity: Option<Decimal>,
    pub avg_per_guest: Decimal,
}

/// Country comparison in USD. Capacity averages skip venues without a figure.
pub fn country_stats(venues: &[&Venue]) -> Vec<CountryStat> {
    let mut groups: BTreeMap<&str, Vec<&Venue>> = BTreeMap::new();
    for &v in venues {
        groups.entry(v.country.as_str()).or_default().push(v);
    }
    groups
        .into_iter()
        .map(|(country, vs)| {
            let bases: Vec<Decimal> = vs.iter().map(|v| v.base_price_usd).collect();
            let caps: Vec<u32> = vs.iter().filter_map(|v| v.seated_capacity).collect();
            let per_guest_sum: Decimal = vs.iter().map(|v| v.per_guest_usd).sum();
            CountryStat {
                country: country.to_string(),
                venues: vs.len(),
                avg_base: mean(bases.iter().copied().sum(), bases.len()),
                min_base: bases.iter().copied().min().unwrap_or_default(),
                max_base: bases.iter().copied().max().unwrap_or_default(),
                avg_capacity: (!caps.is_empty())
                    .then(|| mean(Decimal::from(caps.iter().map(|&c| u64::from(c)).sum::<u64>()), caps.len())),
                avg_per_guest: mean(per_guest_sum, vs.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub country: String,
    pub minimum: Decimal,
    pub average: Decimal,
    pub maximum: Decimal,
}

/// Cost envelopes for `guests` attendees: each bound combines the matching
/// statistic of base price and per-guest price independently.
pub fn budget_scenarios(venues: &[&Venue], countries: &[String], guests: u32) -> Vec<Scenario> {
    let n = Decimal::from(guests);
    countries
        .iter()
        .filter_map(|country| {
            let vs: Vec<&&Venue> = venues.iter().filter(|v| &v.country == country).collect();
            if vs.is_empty() {
                return None;
            }
            let bases: Vec<Decimal> = vs.iter().map(|v| v.base_price_usd).collect();
            let pgs: Vec<Decimal> = vs.iter().map(|v| v.per_guest_usd).collect();
            let (bmin, bmax) = (bases.iter().min()?, bases.iter().max()?);
            let (pmin, pmax) = (pgs.iter().min()?, pgs.iter().max()?);
            let bavg = mean(bases.iter().copied().sum(), bases.len());
            let pavg = mean(pgs.iter().copied().sum(), pgs.len());
            Some(Scenario {
                country: country.clone(),
                minimum: *bmin + n * *pmin,
                average: (bavg + n * pavg).round_dp(2),
                maximum: *bmax + n * *pmax,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub venue: String,
    pub guests: u32,
    pub base: Decimal,
    pub per_guest: Decimal,
    pub guests_cost: Decimal,
    pub total: Decimal,
}

pub fn cost_breakdown(venue: &Venue, guests: u32) -> CostBreakdown {
    let guests_cost = venue.per_guest_usd * Decimal::from(guests);
    CostBreakdown {
        venue: venue.name.clone(),
        guests,
        base: venue.base_price_usd,
        per_guest: venue.per_guest_usd,
        guests_cost,
        total: venue.cost_usd(guests),
    }
}

fn mean(sum: Decimal, n: usize) -> Decimal {
    if n == 0 {
        return Decimal::ZERO;
    }
    (sum / Decimal::from(n)).round_dp(2)
}
