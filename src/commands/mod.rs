// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod venues;
pub mod guests;
pub mod seating;
pub mod analytics;
pub mod exporter;
pub mod fx;
pub mod urls;
pub mod session;
pub mod doctor;

use crate::filters::{GuestFilter, VenueFilter};
use crate::loader::Workspace;
use crate::utils::{parse_decimal, print_warnings, strings};
use anyhow::Result;

pub(crate) fn load_workspace(session: &crate::session::Session) -> Result<Workspace> {
    let ws = Workspace::load(&session.sources())?;
    print_warnings(&ws);
    Ok(ws)
}

pub(crate) fn guest_filter(m: &clap::ArgMatches) -> GuestFilter {
    GuestFilter {
        event: m.get_one::<String>("event").cloned(),
        categories: strings(m, "category"),
        search: m.get_one::<String>("search").cloned(),
    }
}

pub(crate) fn venue_filter(m: &clap::ArgMatches) -> Result<VenueFilter> {
    Ok(VenueFilter {
        countries: strings(m, "country"),
        min_capacity: m.get_one::<u32>("min-capacity").copied(),
        max_capacity: m.get_one::<u32>("max-capacity").copied(),
        min_price: m.get_one::<String>("min-price").map(|s| parse_decimal(s)).transpose()?,
        max_price: m.get_one::<String>("max-price").map(|s| parse_decimal(s)).transpose()?,
    })
}
