// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use vowboard::fx::Currency;
use vowboard::models::{Guest, Venue};
use vowboard::pricing::{PriceEstimate, PriceSource};
use vowboard::stats;

fn events() -> Vec<String> {
    ["Wedding", "Reception", "Brunch"].iter().map(|s| s.to_string()).collect()
}

fn guest(name: &str, category: &str, source: &str, attendance: [bool; 3]) -> Guest {
    Guest {
        name: name.to_string(),
        category: category.to_string(),
        source: source.to_string(),
        attendance: attendance.to_vec(),
        total_events: attendance.iter().filter(|a| **a).count() as u32,
        table: None,
    }
}

fn party() -> Vec<Guest> {
    vec![
        guest("Ann", "Family", "Bride", [true, true, true]),
        guest("Bob", "Family", "Groom", [true, true, false]),
        guest("Cat", "Friends", "Bride", [true, false, false]),
        guest("Dan", "Work", "Groom", [false, false, true]),
    ]
}

#[test]
fn headcounts_and_category_counts() {
    let all = party();
    let guests: Vec<&Guest> = all.iter().collect();
    let heads = stats::event_headcounts(&events(), &guests);
    let counts: Vec<usize> = heads.iter().map(|h| h.attendees).collect();
    assert_eq!(counts, vec![3, 2, 2]);

    assert_eq!(
        stats::category_counts(&guests),
        vec![
            ("Family".to_string(), 2),
            ("Friends".to_string(), 1),
            ("Work".to_string(), 1)
        ]
    );
}

#[test]
fn overlap_diagonal_is_headcount() {
    let all = party();
    let guests: Vec<&Guest> = all.iter().collect();
    let m = stats::overlap_matrix(&events(), &guests);
    assert_eq!(m, vec![vec![3, 2, 1], vec![2, 2, 1], vec![1, 1, 2]]);
}

#[test]
fn overview_counts_single_event_guests() {
    let all = party();
    let guests: Vec<&Guest> = all.iter().collect();
    let o = stats::overview(&events(), &guests);
    assert_eq!(o.guests, 4);
    assert_eq!(o.avg_events, Decimal::new(175, 2));
    assert_eq!(o.attending_all, 1);
    assert_eq!(o.multi_event, 2);
    let only: Vec<usize> = o.only.iter().map(|c| c.attendees).collect();
    assert_eq!(only, vec![1, 0, 1]);

    let patterns = stats::attendance_patterns(&events(), &guests);
    assert_eq!(patterns.len(), 4);
    assert!(patterns.iter().all(|p| p.guests == 1));
    assert!(patterns.iter().any(|p| p.events == vec!["Wedding".to_string()]));
}

#[test]
fn empty_roster_has_zero_means() {
    let o = stats::overview(&events(), &[]);
    assert_eq!(o.guests, 0);
    assert_eq!(o.avg_events, Decimal::ZERO);
}

#[test]
fn category_and_source_breakdowns() {
    let all = party();
    let guests: Vec<&Guest> = all.iter().collect();

    let cats = stats::category_breakdown(&events(), &guests);
    assert_eq!(cats[0].key, "Family");
    assert_eq!(cats[0].total, 2);
    assert_eq!(cats[0].per_event, vec![2, 2, 1]);
    assert_eq!(cats[0].avg_events, Decimal::new(25, 1));

    let sources = stats::source_breakdown(&events(), &guests);
    let keys: Vec<&str> = sources.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["Bride", "Groom"]);
    assert_eq!(sources[1].per_event, vec![1, 1, 2]);
    assert_eq!(sources[1].avg_events, Decimal::new(15, 1));
}

fn venue(name: &str, country: &str, seated: Option<u32>, base: i64, per_guest: i64) -> Venue {
    let price = PriceEstimate {
        base: Decimal::from(base),
        per_guest: Decimal::from(per_guest),
        base_source: PriceSource::Published,
        per_guest_source: PriceSource::Published,
    };
    Venue {
        name: name.to_string(),
        country: country.to_string(),
        style: String::new(),
        seated_capacity: seated,
        reception_capacity: None,
        currency: Currency::Usd,
        hire_text: None,
        per_head_text: None,
        price,
        base_price_usd: price.base,
        per_guest_usd: price.per_guest,
        pricing_url: None,
        website: None,
        exclusive_use: None,
        bedrooms: None,
        airports: None,
        source_file: "test_csv.csv".to_string(),
    }
}

#[test]
fn country_comparison_skips_unknown_capacity() {
    let all = vec![
        venue("Hall", "England", Some(100), 10_000, 100),
        venue("Barn", "England", None, 20_000, 200),
        venue("Mas", "France", Some(60), 15_000, 90),
    ];
    let vs: Vec<&Venue> = all.iter().collect();
    let rows = stats::country_stats(&vs);
    assert_eq!(rows.len(), 2);
    let eng = &rows[0];
    assert_eq!(eng.country, "England");
    assert_eq!(eng.venues, 2);
    assert_eq!(eng.avg_base, Decimal::from(15_000));
    assert_eq!((eng.min_base, eng.max_base), (Decimal::from(10_000), Decimal::from(20_000)));
    assert_eq!(eng.avg_capacity, Some(Decimal::from(100)));
    assert_eq!(eng.avg_per_guest, Decimal::from(150));
}

#[test]
fn budget_scenarios_combine_bounds() {
    let all = vec![
        venue("Hall", "England", Some(100), 10_000, 100),
        venue("Barn", "England", None, 20_000, 200),
    ];
    let vs: Vec<&Venue> = all.iter().collect();
    let countries = vec!["England".to_string(), "Italy".to_string()];
    let rows = stats::budget_scenarios(&vs, &countries, 100);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].minimum, Decimal::from(20_000));
    assert_eq!(rows[0].average, Decimal::from(30_000));
    assert_eq!(rows[0].maximum, Decimal::from(40_000));

    let cost = stats::cost_breakdown(&all[1], 150);
    assert_eq!(cost.guests_cost, Decimal::from(30_000));
    assert_eq!(cost.total, Decimal::from(50_000));
}

#[test]
fn capacity_average_does_not_overflow() {
    let all = vec![
        venue("Arena", "Wales", Some(u32::MAX), 10_000, 100),
        venue("Stadium", "Wales", Some(u32::MAX), 10_000, 100),
    ];
    let vs: Vec<&Venue> = all.iter().collect();
    let rows = stats::country_stats(&vs);
    assert_eq!(rows[0].avg_capacity, Some(Decimal::from(u32::MAX)));
}
