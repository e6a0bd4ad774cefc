// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::loader::{self, classify_country, file_token};
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::{Context, Result};
use std::path::Path;

pub const WEBSITE: &str = "Website";
pub const PRICING_URL: &str = "Pricing Source URL(s)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillStats {
    pub total: usize,
    pub pricing_from_website: usize,
    pub website_from_pricing: usize,
    /// (venue, region) pairs with neither URL.
    pub missing: Vec<(String, String)>,
}

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("fill", _)) = m.subcommand() {
        fill(session)?;
    }
    Ok(())
}

/// Copy each URL column into the other where one is blank; the file is only
/// rewritten when something changed or a column had to be added.
pub fn fill_file(path: &Path) -> Result<FillStats> {
    let mut table = loader::read_table(path)?;
    let had_columns = table.column(WEBSITE).is_some() && table.column(PRICING_URL).is_some();
    let pricing = table.ensure_column(PRICING_URL);
    let website = table.ensure_column(WEBSITE);
    let venue = table.column("Venue");
    let region = table
        .column("Region/Country")
        .or_else(|| table.column("Region"))
        .or_else(|| table.column("Country"));
    let fallback_region = classify_country(&file_token(path));

    let mut stats = FillStats {
        total: table.rows.len(),
        ..FillStats::default()
    };
    for row in 0..table.rows.len() {
        let p = table.cell(row, Some(pricing)).map(str::to_string);
        let w = table.cell(row, Some(website)).map(str::to_string);
        match (p, w) {
            (None, Some(url)) => {
                table.set(row, pricing, url);
                stats.pricing_from_website += 1;
            }
            (Some(url), None) => {
                table.set(row, website, url);
                stats.website_from_pricing += 1;
            }
            (None, None) => {
                let name = table.cell(row, venue).unwrap_or("(unnamed)").to_string();
                let reg = table
                    .cell(row, region)
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_region.clone());
                stats.missing.push((name, reg));
            }
            (Some(_), Some(_)) => {}
        }
    }

    if !had_columns || stats.pricing_from_website + stats.website_from_pricing > 0 {
        loader::write_table(path, &table)?;
        tracing::info!(file = %path.display(), "URL columns updated");
    }
    Ok(stats)
}

fn fill(session: &Session) -> Result<()> {
    let dir = session.data_dir();
    let files = loader::discover_venue_files(&dir)?;
    let mut rows = Vec::new();
    let mut missing = Vec::new();
    for path in files {
        let stats = fill_file(&path).with_context(|| format!("Fill URLs in {}", path.display()))?;
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        rows.push(vec![
            name,
            stats.total.to_string(),
            stats.pricing_from_website.to_string(),
            stats.website_from_pricing.to_string(),
            stats.missing.len().to_string(),
        ]);
        missing.extend(stats.missing);
    }
    println!(
        "{}",
        pretty_table(
            &["File", "Venues", "Pricing ← Website", "Website ← Pricing", "Missing Both"],
            rows
        )
    );
    if !missing.is_empty() {
        println!("Venues requiring manual research:");
        for (venue, region) in &missing {
            println!("  - {} ({})", venue, region);
        }
    }
    Ok(())
}
