// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::utils::{fmt_opt, pretty_table, required, strings};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(session),
        Some(("use-guests", sub)) => {
            let path = existing_file(required(sub, "path")?)?;
            println!("Guest roster: {}", path.display());
            session.guest_file = Some(path);
        }
        Some(("use-venues", sub)) => {
            let paths = strings(sub, "path")
                .iter()
                .map(|p| existing_file(p))
                .collect::<Result<Vec<_>>>()?;
            println!("Using {} venue files", paths.len());
            session.venue_files = paths;
        }
        Some(("set-data-dir", sub)) => {
            let raw = required(sub, "path")?;
            let dir = PathBuf::from(raw)
                .canonicalize()
                .with_context(|| format!("Data dir {} not found", raw))?;
            if !dir.is_dir() {
                bail!("{} is not a directory", dir.display());
            }
            println!("Data dir: {}", dir.display());
            session.data_dir = Some(dir);
        }
        Some(("clear", _)) => {
            session.clear();
            println!("Session overrides and seat assignments cleared");
        }
        _ => {}
    }
    Ok(())
}

fn existing_file(raw: &str) -> Result<PathBuf> {
    let path = PathBuf::from(raw)
        .canonicalize()
        .with_context(|| format!("File {} not found", raw))?;
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    Ok(path)
}

fn show(session: &Session) {
    let venues = if session.venue_files.is_empty() {
        "(discovered)".to_string()
    } else {
        session
            .venue_files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };
    let rows = vec![
        vec!["Session file".into(), fmt_opt(session.path().map(|p| p.display()))],
        vec!["Data dir".into(), session.data_dir().display().to_string()],
        vec![
            "Guest roster".into(),
            session
                .guest_file
                .as_ref()
                .map_or("(default)".to_string(), |p| p.display().to_string()),
        ],
        vec!["Venue files".into(), venues],
        vec![
            "Tables".into(),
            format!("{} × {}", session.tables.num_tables, session.tables.seats_per_table),
        ],
        vec![
            "Seated event".into(),
            session.tables.event.clone().unwrap_or_else(|| "(all guests)".into()),
        ],
        vec![
            "Assignments".into(),
            session
                .assignments
                .as_ref()
                .map_or("(roster tables)".to_string(), |a| a.len().to_string()),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
}
