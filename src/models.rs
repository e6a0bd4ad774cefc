// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::Currency;
use crate::pricing::PriceEstimate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub country: String,
    pub style: String,
    pub seated_capacity: Option<u32>,
    pub reception_capacity: Option<u32>,
    pub currency: Currency,
    pub hire_text: Option<String>,
    pub per_head_text: Option<String>,
    pub price: PriceEstimate, // original currency
    pub base_price_usd: Decimal,
    pub per_guest_usd: Decimal,
    pub pricing_url: Option<String>,
    pub website: Option<String>,
    pub exclusive_use: Option<String>,
    pub bedrooms: Option<String>,
    pub airports: Option<String>,
    pub source_file: String,
}

impl Venue {
    pub fn cost_usd(&self, guests: u32) -> Decimal {
        self.base_price_usd + self.per_guest_usd * Decimal::from(guests)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub category: String,
    pub source: String,
    /// Aligned with `GuestList::events`.
    pub attendance: Vec<bool>,
    pub total_events: u32,
    pub table: Option<u32>,
}

impl Guest {
    pub fn attends(&self, event_idx: usize) -> bool {
        self.attendance.get(event_idx).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestList {
    pub events: Vec<String>,
    pub guests: Vec<Guest>,
    pub has_category: bool,
    pub has_source: bool,
}

impl GuestList {
    pub fn event_index(&self, event: &str) -> Option<usize> {
        self.events.iter().position(|e| e.eq_ignore_ascii_case(event))
    }

    pub fn find(&self, name: &str) -> Option<&Guest> {
        self.guests.iter().find(|g| g.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub num_tables: u32,
    pub seats_per_table: u32,
    /// Attendees of this event form the seating working set.
    pub event: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_tables: 20,
            seats_per_table: 10,
            event: Some("Wedding".to_string()),
        }
    }
}

impl TableConfig {
    pub fn total_capacity(&self) -> u32 {
        self.num_tables * self.seats_per_table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    Empty,
    Partial,
    Full,
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: u32,
    pub capacity: u32,
    pub guests: Vec<String>,
}

impl Table {
    pub fn occupancy(&self) -> Occupancy {
        let n = self.guests.len() as u32;
        if n == 0 {
            Occupancy::Empty
        } else if n < self.capacity {
            Occupancy::Partial
        } else if n == self.capacity {
            Occupancy::Full
        } else {
            Occupancy::Overflow
        }
    }
}
