// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PlannerError;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const SNAPSHOT_FILE: &str = "exchange_rates.json";

/// Both endpoints quote rates *from* USD, so the USD multiplier is `1 / rate`.
pub const RATE_ENDPOINTS: [&str; 2] = [
    "https://open.er-api.com/v6/latest/USD",
    "https://api.exchangerate-api.com/v4/latest/USD",
];

pub const FALLBACK_GBP_TO_USD: Decimal = Decimal::from_parts(127, 0, 0, false, 2);
pub const FALLBACK_EUR_TO_USD: Decimal = Decimal::from_parts(109, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Gbp => "£",
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }

    pub fn fallback_rate(self) -> Decimal {
        match self {
            Currency::Gbp => FALLBACK_GBP_TO_USD,
            Currency::Eur => FALLBACK_EUR_TO_USD,
            Currency::Usd => Decimal::ONE,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = PlannerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GBP" | "£" => Ok(Currency::Gbp),
            "EUR" | "€" => Ok(Currency::Eur),
            "USD" | "$" => Ok(Currency::Usd),
            other => Err(PlannerError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Multipliers into USD. Missing entries fall back to the published constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: BTreeMap<Currency, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, ccy: Currency, to_usd: Decimal) -> Self {
        if ccy != Currency::Usd {
            self.rates.insert(ccy, to_usd);
        }
        self
    }

    pub fn rate(&self, ccy: Currency) -> Decimal {
        match ccy {
            Currency::Usd => Decimal::ONE,
            other => self
                .rates
                .get(&other)
                .copied()
                .unwrap_or_else(|| other.fallback_rate()),
        }
    }

    pub fn from_snapshot(snap: &RateSnapshot) -> Self {
        Self::new()
            .with_rate(Currency::Gbp, snap.gbp_to_usd)
            .with_rate(Currency::Eur, snap.eur_to_usd)
    }
}

pub fn convert(amount: Decimal, from: Currency, table: &RateTable) -> Decimal {
    amount.saturating_mul(table.rate(from))
}

/// Convert between any two supported currencies through the USD hub.
pub fn convert_between(amount: Decimal, from: Currency, to: Currency, table: &RateTable) -> Decimal {
    if from == to {
        return amount;
    }
    let usd = convert(amount, from, table);
    let r = table.rate(to);
    if r.is_zero() {
        return usd;
    }
    usd / r
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Primary,
    Secondary,
    Fallback,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RateSource::Primary => "primary API",
            RateSource::Secondary => "secondary API",
            RateSource::Fallback => "hardcoded fallback",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub gbp_to_usd: Decimal,
    pub eur_to_usd: Decimal,
    pub as_of: String,
    pub fetched_at: DateTime<Utc>,
    pub source: RateSource,
}

impl RateSnapshot {
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            gbp_to_usd: FALLBACK_GBP_TO_USD,
            eur_to_usd: FALLBACK_EUR_TO_USD,
            as_of: "fallback".to_string(),
            fetched_at: now,
            source: RateSource::Fallback,
        }
    }

    pub fn rate(&self, ccy: Currency) -> Decimal {
        RateTable::from_snapshot(self).rate(ccy)
    }
}

/// Body shared by both rate endpoints; only the fields we use.
#[derive(Debug, Deserialize)]
pub struct LatestRates {
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub time_last_update_utc: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl LatestRates {
    /// Turn a USD-based quote into USD multipliers, rejecting missing or
    /// non-positive rates.
    pub fn to_usd_multipliers(&self) -> Result<(Decimal, Decimal)> {
        let inv = |code: &str| -> Result<Decimal> {
            let r = self
                .rates
                .get(code)
                .copied()
                .ok_or_else(|| anyhow!("rate for {} missing", code))?;
            if !(r.is_finite() && r > 0.0) {
                return Err(anyhow!("rate for {} is not positive: {}", code, r));
            }
            let d = Decimal::try_from(r).with_context(|| format!("Invalid rate {} for {}", r, code))?;
            Ok((Decimal::ONE / d).round_dp(6))
        };
        Ok((inv("GBP")?, inv("EUR")?))
    }
}

/// Walk the endpoint chain; the first usable payload wins, constants otherwise.
pub fn resolve_rates<F>(endpoints: &[&str], now: DateTime<Utc>, mut fetch: F) -> RateSnapshot
where
    F: FnMut(&str) -> Result<LatestRates>,
{
    for (i, url) in endpoints.iter().enumerate() {
        let attempt = fetch(url).and_then(|payload| {
            let (gbp, eur) = payload.to_usd_multipliers()?;
            Ok((payload, gbp, eur))
        });
        match attempt {
            Ok((payload, gbp, eur)) => {
                let as_of = payload
                    .time_last_update_utc
                    .or(payload.date)
                    .unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
                tracing::info!(url = *url, %gbp, %eur, "exchange rates fetched");
                return RateSnapshot {
                    gbp_to_usd: gbp,
                    eur_to_usd: eur,
                    as_of,
                    fetched_at: now,
                    source: if i == 0 {
                        RateSource::Primary
                    } else {
                        RateSource::Secondary
                    },
                };
            }
            Err(e) => tracing::warn!(url = *url, error = %e, "rate endpoint failed"),
        }
    }
    tracing::warn!("all rate endpoints failed; using fallback constants");
    RateSnapshot::fallback(now)
}

pub fn fetch_latest(client: &reqwest::blocking::Client, url: &str) -> Result<LatestRates> {
    let resp = client.get(url).send()?.error_for_status()?;
    let body: LatestRates = resp.json()?;
    Ok(body)
}

pub fn load_snapshot(dir: &Path) -> Result<Option<RateSnapshot>> {
    let path = dir.join(SNAPSHOT_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Read {}", path.display()))?;
    let snap = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid rate snapshot {}", path.display()))?;
    Ok(Some(snap))
}

pub fn save_snapshot(dir: &Path, snap: &RateSnapshot) -> Result<()> {
    let path = dir.join(SNAPSHOT_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(snap)?)
        .with_context(|| format!("Write {}", path.display()))?;
    Ok(())
}
