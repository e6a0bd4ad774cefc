// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use vowboard::pricing::{
    self, CapacityBand, PriceInput, PriceSource, band_default, parse_base, parse_capacity,
    parse_per_guest,
};

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

#[test]
fn guide_range_and_from_price() {
    let est = pricing::estimate(&PriceInput {
        name: "Aynhoe Park",
        country: "England",
        seated_capacity: Some(120),
        hire_text: Some("Typical wedding range £19,710–£24,660 (guide); packages £264–£519 pp"),
        per_head_text: Some("From £229 (twilight) to £519 pp"),
    });
    assert_eq!(est.base, d(19_710));
    assert_eq!(est.per_guest, d(229));
    assert_eq!(est.base_source, PriceSource::Published);
    assert_eq!(est.per_guest_source, PriceSource::Published);
}

#[test]
fn from_pattern_sets_per_guest() {
    assert_eq!(parse_per_guest(Some("From €95"), None), Some(d(95)));
    assert_eq!(parse_per_guest(Some("from $1,250 per couple"), None), Some(d(1_250)));
    assert_eq!(parse_per_guest(Some("Menus from £88.50"), None), Some(Decimal::new(8850, 2)));
}

#[test]
fn per_head_field_fallbacks() {
    // bare leading number before a range dash
    assert_eq!(parse_per_guest(Some("95-150"), None), Some(d(95)));
    assert_eq!(parse_per_guest(Some("Menus £120 pp"), None), Some(d(120)));
    assert_eq!(parse_per_guest(Some("€110 (3 courses)"), None), Some(d(110)));
    // a bare count is not a price
    assert_eq!(parse_per_guest(Some("3 courses"), None), None);
}

#[test]
fn per_person_in_package_text_must_be_plausible() {
    let hire = "Exclusive hire £12,500; dinner £85 pp";
    assert_eq!(parse_per_guest(None, Some(hire)), Some(d(85)));
    assert_eq!(parse_base(Some(hire)), Some(d(12_500)));

    assert_eq!(parse_per_guest(None, Some("canapés £25 pp")), None);
    assert_eq!(parse_per_guest(None, Some("Package £2,000 pp")), None);
}

#[test]
fn base_takes_lower_bound_of_first_range() {
    assert_eq!(parse_base(Some("10,000 to 14,000")), Some(d(10_000)));
    assert_eq!(parse_base(Some("£20k–£30k exclusive use")), Some(d(20_000)));
    assert_eq!(parse_base(Some("2024-2025 rates: £9,500 - £12,000")), Some(d(9_500)));
    // a per-person range is skipped in favour of a later amount
    assert_eq!(parse_base(Some("£95–£140 pp; venue hire £6,000")), Some(d(6_000)));
}

#[test]
fn poa_uses_band_default() {
    let est = pricing::estimate(&PriceInput {
        name: "Château Inconnu",
        country: "France",
        seated_capacity: Some(200),
        hire_text: Some("POA"),
        per_head_text: Some("POA"),
    });
    let expected = band_default("France", CapacityBand::Large);
    assert_eq!(est.base, expected.base);
    assert_eq!(est.per_guest, expected.per_guest);
    assert_eq!(est.base, d(30_000));
    assert_eq!(est.per_guest, d(160));
    assert_eq!(est.base_source, PriceSource::Default);
    assert_eq!(est.per_guest_source, PriceSource::Default);
}

#[test]
fn only_missing_half_is_defaulted() {
    let est = pricing::estimate(&PriceInput {
        name: "The Barn",
        country: "England",
        seated_capacity: Some(100),
        hire_text: Some("Venue hire £7,250"),
        per_head_text: None,
    });
    assert_eq!(est.base, d(7_250));
    assert_eq!(est.base_source, PriceSource::Published);
    assert_eq!(est.per_guest, d(110));
    assert_eq!(est.per_guest_source, PriceSource::Default);
}

#[test]
fn capacity_bands() {
    assert_eq!(CapacityBand::for_capacity(None), CapacityBand::Small);
    assert_eq!(CapacityBand::for_capacity(Some(80)), CapacityBand::Small);
    assert_eq!(CapacityBand::for_capacity(Some(81)), CapacityBand::Medium);
    assert_eq!(CapacityBand::for_capacity(Some(150)), CapacityBand::Medium);
    assert_eq!(CapacityBand::for_capacity(Some(151)), CapacityBand::Large);

    let unknown = band_default("Narnia", CapacityBand::Medium);
    assert_eq!((unknown.base, unknown.per_guest), (d(16_000), d(120)));
    let eng = band_default("England", CapacityBand::Small);
    assert_eq!((eng.base, eng.per_guest), (d(8_000), d(85)));
}

#[test]
fn override_beats_published_text() {
    let est = pricing::estimate(&PriceInput {
        name: "Hedsor House",
        country: "England",
        seated_capacity: Some(200),
        hire_text: Some("£5,000 - £9,000"),
        per_head_text: Some("From £60"),
    });
    assert_eq!(est.base, d(19_500));
    assert_eq!(est.per_guest, d(145));
    assert_eq!(est.base_source, PriceSource::Override);

    // override names are exact
    assert!(pricing::venue_override("hedsor house").is_none());
}

#[test]
fn capacity_and_amount_parsing() {
    assert_eq!(parse_capacity("120 seated / 180 standing"), Some(120));
    assert_eq!(parse_capacity("TBC"), None);
    assert_eq!(pricing::parse_amount("£19,710"), Some(d(19_710)));
    assert_eq!(pricing::parse_amount("20k"), Some(d(20_000)));
    assert_eq!(pricing::parse_amount("n/a"), None);
}

#[test]
fn oversized_thousands_amount_falls_back_to_band() {
    assert_eq!(pricing::parse_amount("99,999,999,999,999,999,999,999,999k"), None);
    let est = pricing::estimate(&PriceInput {
        name: "The Counting House",
        country: "England",
        seated_capacity: Some(100),
        hire_text: Some("Hire £99,999,999,999,999,999,999,999,999k"),
        per_head_text: None,
    });
    assert_eq!(est.base, band_default("England", CapacityBand::Medium).base);
    assert_eq!(est.base_source, PriceSource::Default);
}
