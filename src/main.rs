// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vowboard::{cli, commands, session::Session};

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    init_tracing(matches.get_count("verbose"));

    let mut session = Session::open_or_init()?;
    session.override_data_dir(matches.get_one::<String>("data-dir").map(PathBuf::from));

    match matches.subcommand() {
        Some(("venue", sub)) => commands::venues::handle(&session, sub)?,
        Some(("guest", sub)) => commands::guests::handle(&session, sub)?,
        Some(("seating", sub)) => {
            commands::seating::handle(&mut session, sub)?;
            session.save()?;
        }
        Some(("analytics", sub)) => commands::analytics::handle(&session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&session, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&session, sub)?,
        Some(("urls", sub)) => commands::urls::handle(&session, sub)?,
        Some(("session", sub)) => {
            commands::session::handle(&mut session, sub)?;
            session.save()?;
        }
        Some(("doctor", _)) => commands::doctor::handle(&session)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
