// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use tempfile::tempdir;
use vowboard::error::PlannerError;
use vowboard::fx::{
    self, Currency, LatestRates, RateSnapshot, RateSource, RateTable, convert, convert_between,
    resolve_rates,
};

fn quote(gbp: f64, eur: f64) -> LatestRates {
    LatestRates {
        rates: HashMap::from([("GBP".to_string(), gbp), ("EUR".to_string(), eur)]),
        time_last_update_utc: None,
        date: Some("2025-06-01".to_string()),
    }
}

#[test]
fn eur_at_fallback_rate() {
    let usd = convert(Decimal::from(4800), Currency::Eur, &RateTable::new());
    assert_eq!(usd, Decimal::new(523_200, 2));
}

#[test]
fn conversion_divides_back_exactly() {
    let table = RateTable::new();
    for ccy in [Currency::Gbp, Currency::Eur, Currency::Usd] {
        let amount = Decimal::new(1_234_567, 2);
        assert_eq!(convert(amount, ccy, &table) / table.rate(ccy), amount);
    }
}

#[test]
fn supplied_rates_override_fallback_and_usd_is_identity() {
    let table = RateTable::new()
        .with_rate(Currency::Gbp, Decimal::new(135, 2))
        .with_rate(Currency::Usd, Decimal::from(2));
    assert_eq!(table.rate(Currency::Gbp), Decimal::new(135, 2));
    assert_eq!(table.rate(Currency::Eur), fx::FALLBACK_EUR_TO_USD);
    assert_eq!(table.rate(Currency::Usd), Decimal::ONE);
}

#[test]
fn convert_between_goes_through_usd() {
    let table = RateTable::new();
    let eur = convert_between(Decimal::from(100), Currency::Gbp, Currency::Eur, &table);
    assert_eq!(eur.round_dp(2), Decimal::new(11_651, 2));
    let same = convert_between(Decimal::from(42), Currency::Eur, Currency::Eur, &table);
    assert_eq!(same, Decimal::from(42));
}

#[test]
fn currency_codes_and_symbols() {
    assert_eq!(Currency::from_str("eur").unwrap(), Currency::Eur);
    assert_eq!(Currency::from_str(" £ ").unwrap(), Currency::Gbp);
    assert!(matches!(
        Currency::from_str("JPY"),
        Err(PlannerError::UnknownCurrency(code)) if code == "JPY"
    ));
}

#[test]
fn usd_quotes_are_inverted() {
    let (gbp, eur) = quote(0.8, 0.9).to_usd_multipliers().unwrap();
    assert_eq!(gbp, Decimal::new(125, 2));
    assert_eq!(eur, Decimal::new(1_111_111, 6));

    assert!(quote(0.0, 0.9).to_usd_multipliers().is_err());
    assert!(quote(-1.0, 0.9).to_usd_multipliers().is_err());
    let missing = LatestRates {
        rates: HashMap::from([("GBP".to_string(), 0.8)]),
        time_last_update_utc: None,
        date: None,
    };
    assert!(missing.to_usd_multipliers().is_err());
}

#[test]
fn refresh_chain_falls_through_to_secondary() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let mut calls = Vec::new();
    let snap = resolve_rates(&fx::RATE_ENDPOINTS, now, |url| {
        calls.push(url.to_string());
        if calls.len() == 1 {
            // a payload with a zero rate counts as a failure
            Ok(quote(0.0, 0.9))
        } else {
            Ok(quote(0.8, 0.9))
        }
    });
    assert_eq!(calls.len(), 2);
    assert_eq!(snap.source, RateSource::Secondary);
    assert_eq!(snap.gbp_to_usd, Decimal::new(125, 2));
    assert_eq!(snap.as_of, "2025-06-01");
}

#[test]
fn refresh_chain_uses_constants_when_all_fail() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let snap = resolve_rates(&fx::RATE_ENDPOINTS, now, |_| Err(anyhow!("offline")));
    assert_eq!(snap, RateSnapshot::fallback(now));
    assert_eq!(snap.rate(Currency::Gbp), Decimal::new(127, 2));
    assert_eq!(snap.rate(Currency::Eur), Decimal::new(109, 2));
}

#[test]
fn snapshot_round_trips_through_data_dir() {
    let dir = tempdir().unwrap();
    assert!(fx::load_snapshot(dir.path()).unwrap().is_none());

    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let snap = resolve_rates(&fx::RATE_ENDPOINTS, now, |_| Ok(quote(0.8, 0.9)));
    fx::save_snapshot(dir.path(), &snap).unwrap();
    let loaded = fx::load_snapshot(dir.path()).unwrap().unwrap();
    assert_eq!(loaded, snap);
    assert_eq!(loaded.source, RateSource::Primary);

    let table = RateTable::from_snapshot(&loaded);
    assert_eq!(table.rate(Currency::Gbp), Decimal::new(125, 2));
}

#[test]
fn convert_saturates_instead_of_overflowing() {
    assert_eq!(convert(Decimal::MAX, Currency::Gbp, &RateTable::default()), Decimal::MAX);
}
