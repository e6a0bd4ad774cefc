// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use vowboard::seating::Assignments;
use vowboard::session::Session;
use vowboard::{cli, commands::exporter};

const GUESTS: &str = "Name,Category,Source,Wedding,Reception,Table\n\
Zed,Friends,Groom,1,1,2\n\
Amy,Family,Bride,1,0,2\n\
Bob,Family,Groom,1,1,1\n\
Cy,Work,Bride,1,0,\n\
Dee,Family,Bride,0,1,3\n";

fn workspace(dir: &Path) -> Session {
    fs::write(dir.join("guest_list.csv"), GUESTS).unwrap();
    fs::write(
        dir.join("england_csv.csv"),
        "Venue,Seated Capacity,Published Venue Hire / Package (GBP)\n\
         Hall,120,\"£10,000 - £12,000\"\n\
         Cottage,40,POA\n",
    )
    .unwrap();
    Session::in_memory(dir)
}

fn run(session: &Session, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["vowboard", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, export) = matches.subcommand().expect("export subcommand");
    exporter::handle(session, export)
}

#[test]
fn seating_chart_is_sorted_by_table_then_name() {
    let dir = tempdir().unwrap();
    let session = workspace(dir.path());
    let out = dir.path().join("chart.csv");
    let out_str = out.to_string_lossy().to_string();

    run(&session, &["seating", "--out", &out_str]).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // Dee skips the Wedding, which is the seated event by default
    assert_eq!(
        lines,
        vec![
            "Table,Guest Name,Category,Source",
            "1,Bob,Family,Groom",
            "2,Amy,Family,Bride",
            "2,Zed,Friends,Groom",
        ]
    );
}

#[test]
fn session_assignments_replace_roster_tables() {
    let dir = tempdir().unwrap();
    let mut session = workspace(dir.path());
    session.assignments = Some(Assignments::from([("Cy".to_string(), 4)]));
    let out = dir.path().join("chart.json");
    let out_str = out.to_string_lossy().to_string();

    run(&session, &["seating", "--format", "json", "--out", &out_str]).unwrap();

    let rows: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["guest"], "Cy");
    assert_eq!(rows[0]["table"], 4);
}

#[test]
fn unknown_format_writes_nothing() {
    let dir = tempdir().unwrap();
    let session = workspace(dir.path());
    let out = dir.path().join("guests.xml");
    let out_str = out.to_string_lossy().to_string();

    let err = run(&session, &["guests", "--format", "xml", "--out", &out_str]).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn guest_export_honours_filters() {
    let dir = tempdir().unwrap();
    let session = workspace(dir.path());
    let out = dir.path().join("family.json");
    let out_str = out.to_string_lossy().to_string();

    run(
        &session,
        &["guests", "--category", "Family", "--event", "reception", "--format", "json", "--out", &out_str],
    )
    .unwrap();

    let rows: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["Bob", "Dee"]);
    assert_eq!(rows[0]["events"]["Wedding"], true);
}

#[test]
fn venue_export_carries_usd_and_provenance() {
    let dir = tempdir().unwrap();
    let session = workspace(dir.path());
    let out = dir.path().join("venues.csv");
    let out_str = out.to_string_lossy().to_string();

    run(&session, &["venues", "--min-capacity", "100", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "Venue");
    assert_eq!(&headers[8], "Base Price (USD)");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "Hall");
    assert_eq!(&rows[0][5], "GBP");
    assert_eq!(&rows[0][6], "10000");
    assert_eq!(&rows[0][8], "12700.00");
    assert_eq!(&rows[0][10], "published/default estimate");
}
