// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn guest_filters(cmd: Command) -> Command {
    cmd.arg(Arg::new("event").long("event").help("Only guests attending this event"))
        .arg(
            Arg::new("category")
                .long("category")
                .action(ArgAction::Append)
                .help("Only these categories (repeatable)"),
        )
        .arg(Arg::new("search").long("search").help("Case-insensitive name search"))
}

fn venue_filters(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("country")
            .long("country")
            .action(ArgAction::Append)
            .help("Only these countries (repeatable)"),
    )
    .arg(Arg::new("min-capacity").long("min-capacity").value_parser(value_parser!(u32)))
    .arg(Arg::new("max-capacity").long("max-capacity").value_parser(value_parser!(u32)))
    .arg(Arg::new("min-price").long("min-price").help("Minimum base price (USD)"))
    .arg(Arg::new("max-price").long("max-price").help("Maximum base price (USD)"))
}

fn format_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("format")
            .long("format")
            .default_value("csv")
            .help("csv|json"),
    )
    .arg(Arg::new("out").long("out").help("Output path (default: dated file name)"))
}

pub fn build_cli() -> Command {
    Command::new("vowboard")
        .about("Wedding planning dashboard: venues, guests, seating and analytics")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .env("VOWBOARD_DATA_DIR")
                .help("Directory holding *_csv.csv venue files and guest_list.csv"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("venue")
                .about("Compare venues")
                .subcommand(json_flags(venue_filters(Command::new("list").about("Filtered venue table"))))
                .subcommand(
                    json_flags(Command::new("show").about("One venue in detail"))
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    json_flags(Command::new("cost").about("Cost calculator"))
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("guests")
                                .long("guests")
                                .value_parser(value_parser!(u32).range(1..=1000))
                                .default_value("150"),
                        ),
                )
                .subcommand(json_flags(venue_filters(
                    Command::new("compare").about("Per-country comparison"),
                )))
                .subcommand(
                    json_flags(Command::new("scenarios").about("Budget scenarios per country"))
                        .arg(
                            Arg::new("guests")
                                .long("guests")
                                .value_parser(value_parser!(u32))
                                .default_value("150"),
                        )
                        .arg(Arg::new("country").long("country").action(ArgAction::Append)),
                ),
        )
        .subcommand(
            Command::new("guest")
                .about("Guest list")
                .subcommand(json_flags(guest_filters(Command::new("list").about("Filtered guest list"))))
                .subcommand(json_flags(guest_filters(
                    Command::new("stats").about("Headcounts for the filtered set"),
                ))),
        )
        .subcommand(
            Command::new("seating")
                .about("Table seating")
                .subcommand(
                    Command::new("config")
                        .about("Set table count, seats per table and the seated event")
                        .arg(
                            Arg::new("tables")
                                .long("tables")
                                .value_parser(value_parser!(u32).range(1..=50)),
                        )
                        .arg(
                            Arg::new("seats")
                                .long("seats")
                                .value_parser(value_parser!(u32).range(1..=20)),
                        )
                        .arg(Arg::new("event").long("event"))
                        .arg(
                            Arg::new("all-guests")
                                .long("all-guests")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("event")
                                .help("Seat every guest regardless of event"),
                        ),
                )
                .subcommand(
                    Command::new("arrange")
                        .about("Clear and rebuild all assignments")
                        .arg(
                            Arg::new("policy")
                                .long("policy")
                                .value_parser(["random", "category"])
                                .default_value("random"),
                        )
                        .arg(Arg::new("seed").long("seed").value_parser(value_parser!(u64))),
                )
                .subcommand(
                    Command::new("assign")
                        .about("Put one guest at a table")
                        .arg(Arg::new("guest").required(true))
                        .arg(Arg::new("table").required(true).value_parser(value_parser!(u32))),
                )
                .subcommand(
                    Command::new("unassign")
                        .about("Remove one guest's table")
                        .arg(Arg::new("guest").required(true)),
                )
                .subcommand(Command::new("reset").about("Clear every assignment"))
                .subcommand(json_flags(Command::new("show").about("Table layout with occupancy"))),
        )
        .subcommand(
            Command::new("analytics")
                .about("Guest analytics")
                .subcommand(json_flags(Command::new("overview")))
                .subcommand(json_flags(Command::new("overlap")))
                .subcommand(json_flags(Command::new("sources")))
                .subcommand(json_flags(Command::new("categories"))),
        )
        .subcommand(
            Command::new("export")
                .about("Write CSV/JSON downloads")
                .subcommand(format_args(guest_filters(Command::new("guests"))))
                .subcommand(format_args(venue_filters(Command::new("venues"))))
                .subcommand(format_args(Command::new("seating"))),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(
                    Command::new("refresh")
                        .about("Fetch GBP/EUR→USD rates and write (USD) columns into the venue CSVs")
                        .arg(
                            Arg::new("offline")
                                .long("offline")
                                .action(ArgAction::SetTrue)
                                .help("Skip the network and use the fallback constants"),
                        ),
                )
                .subcommand(json_flags(Command::new("rates").about("Rates the dashboard converts with")))
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").default_value("USD")),
                ),
        )
        .subcommand(
            Command::new("urls")
                .about("Venue URLs")
                .subcommand(Command::new("fill").about("Back-fill Website / Pricing Source URL(s)")),
        )
        .subcommand(
            Command::new("session")
                .about("Session overrides")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("use-guests").arg(Arg::new("path").required(true)))
                .subcommand(
                    Command::new("use-venues")
                        .arg(Arg::new("path").required(true).num_args(1..)),
                )
                .subcommand(Command::new("set-data-dir").arg(Arg::new("path").required(true)))
                .subcommand(Command::new("clear")),
        )
        .subcommand(Command::new("doctor").about("Report schema problems in the input files"))
}
