// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Price extraction from free-text venue pricing fields.
//!
//! Venues publish prices as prose ("Typical wedding range £19,710–£24,660
//! (guide); packages £264–£519 pp", "POA", "From €95"). [`estimate`] turns the
//! hire/package text and the per-head text into a base price and a per-guest
//! price in the venue's own currency. Every path ends in a number: values the
//! text does not yield come from a per-venue override table or, failing that,
//! from a default keyed by country and capacity band.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Per-person prices outside this window in a package field are treated as noise.
const PP_MIN: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const PP_MAX: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

const AMT: &str = r"[£€$]?\s*\d[\d,]*(?:\.\d+)?(?:\s*[kK]\b)?";
const PP_TAG: &str = r"(?:pp\b|pph\b|per\s+(?:person|head|guest))";

static FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bfrom\s+({AMT})")).expect("valid from regex")
});
static LEADING_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*({AMT})\s*[-–—]")).expect("valid leading range regex")
});
static PP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)({AMT})(?:\s*[-–—]\s*{AMT})?\s*{PP_TAG}")).expect("valid pp regex")
});
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)({AMT})\s*(?:[-–—]|\bto\b)\s*({AMT})")).expect("valid range regex")
});
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(AMT).expect("valid amount regex"));
static PP_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^\s*{PP_TAG}")).expect("valid pp tail regex"));
static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid integer regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    pub base: Decimal,
    pub per_guest: Decimal,
}

const fn pair(base: i64, per_guest: i64) -> PricePair {
    PricePair {
        base: Decimal::from_parts(base as u32, 0, 0, false, 0),
        per_guest: Decimal::from_parts(per_guest as u32, 0, 0, false, 0),
    }
}

/// Venues whose published text is known to mislead the parser. Exact,
/// case-sensitive names; amounts in the venue's own currency.
static VENUE_OVERRIDES: Lazy<HashMap<&'static str, PricePair>> = Lazy::new(|| {
    HashMap::from([
        ("Hedsor House", pair(19_500, 145)),
        ("Cripps Barn", pair(11_500, 89)),
        ("Kinloch Lodge", pair(9_000, 95)),
        ("Château de Varennes", pair(22_000, 135)),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityBand {
    Small,
    Medium,
    Large,
}

impl CapacityBand {
    /// Unknown capacity lands in the smallest band.
    pub fn for_capacity(seated: Option<u32>) -> Self {
        match seated {
            Some(c) if c > 150 => CapacityBand::Large,
            Some(c) if c > 80 => CapacityBand::Medium,
            _ => CapacityBand::Small,
        }
    }

    fn index(self) -> usize {
        match self {
            CapacityBand::Small => 0,
            CapacityBand::Medium => 1,
            CapacityBand::Large => 2,
        }
    }
}

impl fmt::Display for CapacityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CapacityBand::Small => "small",
            CapacityBand::Medium => "medium",
            CapacityBand::Large => "large",
        };
        f.write_str(s)
    }
}

/// Country → [small, medium, large] defaults in the country's currency.
static BAND_DEFAULTS: Lazy<HashMap<&'static str, [PricePair; 3]>> = Lazy::new(|| {
    HashMap::from([
        ("England", [pair(8_000, 85), pair(15_000, 110), pair(25_000, 140)]),
        ("Scotland", [pair(7_000, 80), pair(13_000, 100), pair(22_000, 130)]),
        ("Wales", [pair(6_500, 75), pair(12_000, 95), pair(20_000, 120)]),
        ("France", [pair(10_000, 95), pair(18_000, 125), pair(30_000, 160)]),
        ("Italy", [pair(11_000, 110), pair(20_000, 140), pair(32_000, 175)]),
        ("United States", [pair(12_000, 120), pair(22_000, 150), pair(35_000, 185)]),
    ])
});

static GENERIC_DEFAULTS: [PricePair; 3] = [pair(9_000, 90), pair(16_000, 120), pair(27_000, 150)];

pub fn band_default(country: &str, band: CapacityBand) -> PricePair {
    let row = BAND_DEFAULTS.get(country).unwrap_or(&GENERIC_DEFAULTS);
    row[band.index()]
}

pub fn venue_override(name: &str) -> Option<PricePair> {
    VENUE_OVERRIDES.get(name).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Override,
    Published,
    Default,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceSource::Override => "override",
            PriceSource::Published => "published",
            PriceSource::Default => "default estimate",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub base: Decimal,
    pub per_guest: Decimal,
    pub base_source: PriceSource,
    pub per_guest_source: PriceSource,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriceInput<'a> {
    pub name: &'a str,
    pub country: &'a str,
    pub seated_capacity: Option<u32>,
    pub hire_text: Option<&'a str>,
    pub per_head_text: Option<&'a str>,
}

pub fn estimate(input: &PriceInput<'_>) -> PriceEstimate {
    if let Some(p) = venue_override(input.name) {
        return PriceEstimate {
            base: p.base,
            per_guest: p.per_guest,
            base_source: PriceSource::Override,
            per_guest_source: PriceSource::Override,
        };
    }

    let fallback = band_default(input.country, CapacityBand::for_capacity(input.seated_capacity));
    let (base, base_source) = match parse_base(input.hire_text) {
        Some(b) => (b, PriceSource::Published),
        None => (fallback.base, PriceSource::Default),
    };
    let (per_guest, per_guest_source) = match parse_per_guest(input.per_head_text, input.hire_text) {
        Some(p) => (p, PriceSource::Published),
        None => (fallback.per_guest, PriceSource::Default),
    };
    if base_source == PriceSource::Default || per_guest_source == PriceSource::Default {
        tracing::debug!(venue = input.name, country = input.country, "price defaulted from capacity band");
    }
    PriceEstimate {
        base,
        per_guest,
        base_source,
        per_guest_source,
    }
}

/// Per-guest price: the per-head column first, then per-person figures
/// quoted inside the package text.
pub fn parse_per_guest(per_head: Option<&str>, hire: Option<&str>) -> Option<Decimal> {
    if let Some(text) = per_head.filter(|t| !t.trim().is_empty()) {
        let hit = first_capture(&FROM_RE, text)
            .or_else(|| first_capture(&LEADING_RANGE_RE, text))
            .or_else(|| first_capture(&PP_RE, text))
            .or_else(|| {
                AMOUNT_RE
                    .find(text)
                    .map(|m| m.as_str())
                    .filter(|tok| has_currency_marker(tok))
                    .and_then(parse_amount)
            });
        if hit.is_some() {
            return hit;
        }
    }
    let text = hire?;
    PP_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).and_then(|m| parse_amount(m.as_str())))
        .find(|v| (PP_MIN..=PP_MAX).contains(v))
}

/// Base price: lower bound of the first non-per-person range, else the first
/// standalone money amount that is not per person.
pub fn parse_base(hire: Option<&str>) -> Option<Decimal> {
    let text = hire.filter(|t| !t.trim().is_empty())?;

    for caps in RANGE_RE.captures_iter(text) {
        let (Some(whole), Some(lo), Some(hi)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if PP_TAIL_RE.is_match(&text[whole.end()..]) {
            continue;
        }
        if looks_like_year(lo.as_str()) && looks_like_year(hi.as_str()) {
            continue;
        }
        if let Some(v) = parse_amount(lo.as_str()) {
            return Some(v);
        }
    }

    let pp_spans: Vec<std::ops::Range<usize>> = PP_RE.find_iter(text).map(|m| m.range()).collect();
    AMOUNT_RE
        .find_iter(text)
        .filter(|m| has_currency_marker(m.as_str()))
        .filter(|m| !PP_TAIL_RE.is_match(&text[m.end()..]))
        .filter(|m| !pp_spans.iter().any(|s| s.contains(&m.start())))
        .find_map(|m| parse_amount(m.as_str()))
}

/// First integer in a capacity cell ("120 seated / 180 standing" → 120).
pub fn parse_capacity(text: &str) -> Option<u32> {
    INT_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Parse "£19,710", "€95.50", "20k" into a plain amount.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let mut cleaned: String = token
        .chars()
        .filter(|c| !matches!(c, '£' | '€' | '$' | ',') && !c.is_whitespace())
        .collect();
    let thousands = cleaned.ends_with(['k', 'K']);
    if thousands {
        cleaned.pop();
    }
    let v = cleaned.parse::<Decimal>().ok()?;
    if thousands { v.checked_mul(Decimal::ONE_THOUSAND) } else { Some(v) }
}

fn first_capture(re: &Regex, text: &str) -> Option<Decimal> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_amount(m.as_str()))
}

fn has_currency_marker(token: &str) -> bool {
    token.contains(['£', '€', '$', ',']) || token.trim_end().ends_with(['k', 'K'])
}

fn looks_like_year(token: &str) -> bool {
    let t = token.trim();
    t.len() == 4 && (t.starts_with("19") || t.starts_with("20")) && t.chars().all(|c| c.is_ascii_digit())
}
