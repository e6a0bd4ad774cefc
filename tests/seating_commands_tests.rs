// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;
use tempfile::tempdir;
use vowboard::commands::{exporter, guests, seating};
use vowboard::error::PlannerError;
use vowboard::loader::Workspace;
use vowboard::seating::Assignments;
use vowboard::session::Session;
use vowboard::{cli, filters::GuestFilter};

fn session_with(dir: &Path, roster: &str) -> Session {
    fs::write(dir.join("guest_list.csv"), roster).unwrap();
    Session::in_memory(dir)
}

fn seating_cmd(session: &mut Session, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["vowboard", "seating"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, sub) = matches.subcommand().expect("seating subcommand");
    seating::handle(session, sub)
}

fn seats(session: &Session) -> &Assignments {
    session.assignments.as_ref().expect("session assignments")
}

fn current(session: &Session) -> Assignments {
    let ws = Workspace::load(&session.sources()).unwrap();
    seating::current_assignments(session, &ws)
}

const ROSTER: &str = "Name,Category,Source,Wedding,Brunch,Table\n\
Ann,Family,Bride,1,1,3\n\
Bob,Family,Groom,1,0,\n\
Cat,Friends,Bride,1,1,\n\
Dan,Friends,Groom,1,0,\n\
Eve,Work,Bride,0,1,\n";

#[test]
fn config_then_category_arrange() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), ROSTER);

    seating_cmd(&mut session, &["config", "--tables", "2", "--seats", "2"]).unwrap();
    assert_eq!(session.tables.num_tables, 2);
    assert_eq!(session.tables.seats_per_table, 2);

    seating_cmd(&mut session, &["arrange", "--policy", "category"]).unwrap();
    // Eve skips the Wedding, so only four guests are seated
    let seats = seats(&session);
    assert_eq!(seats.len(), 4);
    assert_eq!(seats["Ann"], seats["Bob"]);
    assert_eq!(seats["Cat"], seats["Dan"]);
    assert_ne!(seats["Ann"], seats["Cat"]);
    assert!(!seats.contains_key("Eve"));
}

#[test]
fn seeded_random_arrange_is_repeatable() {
    let dir = tempdir().unwrap();
    let mut first = session_with(dir.path(), ROSTER);
    let mut second = Session::in_memory(dir.path());

    seating_cmd(&mut first, &["arrange", "--seed", "42"]).unwrap();
    seating_cmd(&mut second, &["arrange", "--seed", "42"]).unwrap();
    assert_eq!(first.assignments, second.assignments);
    // 20 tables of 10: everyone lands at table 1
    assert!(seats(&first).values().all(|t| *t == 1));
}

#[test]
fn all_guests_widens_the_working_set() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), ROSTER);
    seating_cmd(&mut session, &["config", "--all-guests"]).unwrap();
    assert_eq!(session.tables.event, None);

    let ws = Workspace::load(&session.sources()).unwrap();
    assert_eq!(seating::working_set(&session, &ws).len(), 5);
}

#[test]
fn manual_edits_seed_from_roster_tables() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), ROSTER);

    seating_cmd(&mut session, &["assign", "Bob", "3"]).unwrap();
    // Ann's roster table is carried into the session on the first edit
    assert_eq!(seats(&session).get("Ann"), Some(&3));
    assert_eq!(seats(&session).get("Bob"), Some(&3));

    seating_cmd(&mut session, &["unassign", "Ann"]).unwrap();
    assert!(!seats(&session).contains_key("Ann"));

    seating_cmd(&mut session, &["reset"]).unwrap();
    assert_eq!(session.assignments, Some(Assignments::new()));
}

#[test]
fn unassign_clears_a_seat_taken_from_the_roster() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), "Name,Wedding,Table\nAnn,1,3\nBob,1,4\n");
    assert_eq!(current(&session).get("Ann"), Some(&3));

    seating_cmd(&mut session, &["unassign", "Ann"]).unwrap();
    assert_eq!(current(&session), Assignments::from([("Bob".to_string(), 4)]));
}

#[test]
fn reset_leaves_nobody_seated_despite_roster_tables() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), "Name,Category,Source,Wedding,Table\nAnn,Family,Bride,1,3\nBob,Family,Groom,1,4\n");

    seating_cmd(&mut session, &["arrange", "--seed", "1"]).unwrap();
    seating_cmd(&mut session, &["reset"]).unwrap();
    assert!(current(&session).is_empty());

    let out = dir.path().join("chart.csv");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from(["vowboard", "export", "seating", "--out", &out_str]);
    let (_, export) = matches.subcommand().expect("export subcommand");
    exporter::handle(&session, export).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap().trim_end(), "Table,Guest Name,Category,Source");
}

#[test]
fn assign_rejects_unknown_guest_and_table() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), ROSTER);

    let err = seating_cmd(&mut session, &["assign", "Zoe", "1"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PlannerError>(),
        Some(PlannerError::NotFound { entity_type: "Guest", .. })
    ));

    let err = seating_cmd(&mut session, &["assign", "Ann", "21"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PlannerError>(),
        Some(PlannerError::TableOutOfRange { table: 21, max: 20 })
    ));
}

#[test]
fn category_features_need_a_category_column() {
    let dir = tempdir().unwrap();
    let mut session = session_with(dir.path(), "Name,Wedding\nAnn,1\nBob,1\n");

    let err = seating_cmd(&mut session, &["arrange", "--policy", "category"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PlannerError>(),
        Some(PlannerError::FeatureDisabled { .. })
    ));

    let ws = Workspace::load(&session.sources()).unwrap();
    let filter = GuestFilter {
        categories: vec!["Family".to_string()],
        ..GuestFilter::default()
    };
    assert!(guests::filtered(&ws.guests, &filter).is_err());
    assert_eq!(guests::filtered(&ws.guests, &GuestFilter::default()).unwrap().len(), 2);
}
