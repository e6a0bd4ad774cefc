// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PlannerError;
use crate::models::{Guest, GuestList, Venue};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default)]
pub struct GuestFilter {
    pub event: Option<String>,
    /// Empty means every category.
    pub categories: Vec<String>,
    pub search: Option<String>,
}

impl GuestFilter {
    pub fn apply<'a>(&self, list: &'a GuestList) -> Result<Vec<&'a Guest>, PlannerError> {
        let event_idx = match &self.event {
            Some(e) => Some(list.event_index(e).ok_or_else(|| PlannerError::NotFound {
                entity_type: "Event",
                identifier: e.clone(),
            })?),
            None => None,
        };
        let needle = self.search.as_ref().map(|s| s.to_lowercase());
        Ok(list
            .guests
            .iter()
            .filter(|g| event_idx.is_none_or(|i| g.attends(i)))
            .filter(|g| self.categories.is_empty() || self.categories.iter().any(|c| c == &g.category))
            .filter(|g| {
                needle
                    .as_deref()
                    .is_none_or(|n| g.name.to_lowercase().contains(n))
            })
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VenueFilter {
    /// Empty means every country.
    pub countries: Vec<String>,
    pub min_capacity: Option<u32>,
    pub max_capacity: Option<u32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl VenueFilter {
    /// Venues without a known seated capacity pass the capacity bounds.
    pub fn apply<'a>(&self, venues: &'a [Venue]) -> Vec<&'a Venue> {
        venues
            .iter()
            .filter(|v| {
                self.countries.is_empty()
                    || self.countries.iter().any(|c| c.eq_ignore_ascii_case(&v.country))
            })
            .filter(|v| match v.seated_capacity {
                None => true,
                Some(c) => {
                    self.min_capacity.is_none_or(|lo| c >= lo)
                        && self.max_capacity.is_none_or(|hi| c <= hi)
                }
            })
            .filter(|v| {
                self.min_price.is_none_or(|lo| v.base_price_usd >= lo)
                    && self.max_price.is_none_or(|hi| v.base_price_usd <= hi)
            })
            .collect()
    }
}
