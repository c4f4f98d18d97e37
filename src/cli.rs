// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .help("User id (defaults to KUDI_USER or the configured default user)")
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .requires("to")
            .help("Window start, YYYY-MM-DD (inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .requires("from")
            .help("Window end, YYYY-MM-DD (inclusive, whole day)"),
    )
}

fn report(name: &'static str, about: &'static str) -> Command {
    json_args(window_args(Command::new(name).about(about).arg(user_arg())))
}

pub fn build_cli() -> Command {
    Command::new("kudi")
        .about("Transaction analytics for a personal banking dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show").about("Print the resolved configuration"))
                .subcommand(
                    Command::new("set-currency")
                        .about("Currency code used when printing amounts")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("set-user")
                        .about("User used when --user is not given")
                        .arg(Arg::new("user").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(user_arg())
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to now"))
                        .arg(Arg::new("status").long("status").default_value("completed"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(Arg::new("payment-method").long("payment-method")),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("List transactions with client-side filters")
                        .arg(user_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("search").long("search"))
                        .arg(Arg::new("range").long("range").default_value("30days"))
                        .arg(Arg::new("sort").long("sort").default_value("date"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("recent")
                        .about("Most recent transactions, unfiltered")
                        .arg(user_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("10"),
                        ),
                )),
        )
        .subcommand(
            Command::new("card")
                .about("Manage cards")
                .subcommand(
                    Command::new("add")
                        .about("Add a card")
                        .arg(user_arg())
                        .arg(Arg::new("kind").long("kind").default_value("debit"))
                        .arg(Arg::new("last4").long("last4").required(true))
                        .arg(Arg::new("bank").long("bank").required(true))
                        .arg(Arg::new("balance").long("balance").default_value("0")),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("List cards")
                        .arg(user_arg())
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include deactivated cards"),
                        ),
                ))
                .subcommand(
                    Command::new("deactivate")
                        .about("Deactivate a card")
                        .arg(user_arg())
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated analytics")
                .subcommand(report("trend", "Monthly income and expenses"))
                .subcommand(report("categories", "Spending by category with trend"))
                .subcommand(report("overview", "Growth, averages and health score"))
                .subcommand(report("dashboard", "Home view totals"))
                .subcommand(report("summary", "All-time ledger summary"))
                .subcommand(report("payment-methods", "Usage per payment method")),
        )
        .subcommand(
            Command::new("import")
                .about("Import transactions")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV")
                        .arg(user_arg())
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check card balances against the ledger")
                .arg(user_arg()),
        )
}
