// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::loader::Workspace;
use crate::pricing::PriceSource;
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;

/// Issue rows for a loaded workspace: schema warnings, then estimated prices.
pub fn issues(ws: &Workspace) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = ws
        .warnings
        .iter()
        .map(|w| vec!["schema".into(), w.clone()])
        .collect();

    for v in &ws.venues {
        let mut defaulted = Vec::new();
        if v.price.base_source == PriceSource::Default {
            defaulted.push("base");
        }
        if v.price.per_guest_source == PriceSource::Default {
            defaulted.push("per-guest");
        }
        if !defaulted.is_empty() {
            rows.push(vec![
                "default_price".into(),
                format!("{} ({}): {} estimated", v.name, v.country, defaulted.join(" + ")),
            ]);
        }
        if v.seated_capacity.is_none() {
            rows.push(vec!["unknown_capacity".into(), format!("{} ({})", v.name, v.country)]);
        }
    }
    if ws.snapshot.is_none() {
        rows.push(vec![
            "fallback_rates".into(),
            "no exchange_rates.json; converting with GBP 1.27 / EUR 1.09".into(),
        ]);
    }
    rows
}

pub fn handle(session: &Session) -> Result<()> {
    // Warnings are listed in the table rather than echoed to stderr.
    let ws = Workspace::load(&session.sources())?;
    let rows = issues(&ws);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
