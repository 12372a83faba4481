// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    ]
}

fn name_arg() -> Arg {
    Arg::new("name").long("name").required(true)
}

pub fn build_cli() -> Command {
    Command::new("treasurer")
        .about("Community treasury ledger: income/expense records and weekly/monthly statements")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("TREASURER_DB")
                .help("Path to the ledger database (default: platform data dir)"),
        )
        .arg(
            Arg::new("owner")
                .long("owner")
                .global(true)
                .env("TREASURER_OWNER")
                .default_value("default")
                .help("Ledger owner; every record is scoped to one owner"),
        )
        .subcommand(Command::new("init").about("Create the database if needed"))
        .subcommand(
            Command::new("category")
                .about("Manage top-level income/expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(name_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("rename")
                        .arg(name_arg())
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(Command::new("rm").arg(name_arg())),
        )
        .subcommand(
            Command::new("subcategory")
                .about("Manage sub-categories under a category")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(name_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("category").long("category"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("rename")
                        .arg(name_arg().help("Sub-category, as Name or Category/Name"))
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(name_arg().help("Sub-category, as Name or Category/Name")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD[ HH:MM]; default now"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("sub-category")
                                .long("sub-category")
                                .required(true)
                                .help("Name or Category/Name"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"])
                                .help("Must match the sub-category when given"),
                        )
                        .arg(Arg::new("description").long("description").default_value("")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("sub-category").long("sub-category"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("settings")
                .about("Organisation details and opening balance")
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("mosque-name").long("mosque-name"))
                        .arg(Arg::new("mosque-address").long("mosque-address"))
                        .arg(Arg::new("chairman").long("chairman"))
                        .arg(Arg::new("treasurer").long("treasurer"))
                        .arg(
                            Arg::new("opening-balance")
                                .long("opening-balance")
                                .allow_hyphen_values(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Statements and overview")
                .subcommand(
                    Command::new("statement")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["weekly", "monthly"])
                                .default_value("monthly"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Reference date inside the wanted period; default today"),
                        )
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .requires("to")
                                .conflicts_with_all(["date", "kind"]),
                        )
                        .arg(Arg::new("to").long("to").requires("from"))
                        .arg(
                            Arg::new("strict")
                                .long("strict")
                                .action(ArgAction::SetTrue)
                                .help("Fail instead of leaving out transactions with broken references"),
                        )
                        .arg(
                            Arg::new("detail")
                                .long("detail")
                                .action(ArgAction::SetTrue)
                                .help("List every transaction under its sub-category"),
                        )
                        .arg(Arg::new("csv").long("csv").help("Write the statement as CSV to this path"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("overview")
                        .arg(
                            Arg::new("recent")
                                .long("recent")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .about("CSV columns: date,type,amount,category,sub_category,description")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Report transactions that cannot be placed in the category tree"))
}
