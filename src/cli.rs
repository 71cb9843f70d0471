// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, value_parser, ArgAction, Command};

fn json_flag() -> clap::Arg {
    arg!(--json "Print JSON instead of a table").action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(clap::crate_version!())
        .about("Personal finance tracking: transactions, budgets and savings goals")
        .arg(arg!(--user <UID> "User id to sign in as").global(true))
        .arg(arg!(--remote <URL> "Base URL of a REST document store").global(true))
        .subcommand(Command::new("init").about("Create the local store and print its location"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--kind <KIND> "income|expense").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--method <METHOD> "Payment method").default_value("cash"))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to now"))
                        .arg(arg!(--description <TEXT>))
                        .arg(arg!(--tag <TAG>).action(ArgAction::Append)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(arg!(--month <MONTH> "YYYY-MM"))
                        .arg(arg!(--category <CATEGORY>))
                        .arg(arg!(--limit <N>).value_parser(value_parser!(usize)))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("update")
                        .arg(arg!(<ID>))
                        .arg(arg!(--kind <KIND>))
                        .arg(arg!(--amount <AMOUNT>))
                        .arg(arg!(--category <CATEGORY>))
                        .arg(arg!(--method <METHOD>))
                        .arg(arg!(--date <DATE>))
                        .arg(arg!(--description <TEXT>)),
                )
                .subcommand(Command::new("delete").arg(arg!(<ID>))),
        )
        .subcommand(
            Command::new("budget")
                .about("Category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--limit <AMOUNT>).required(true))
                        .arg(arg!(--period <PERIOD> "weekly|monthly").default_value("monthly"))
                        .arg(arg!(--start <DATE> "YYYY-MM-DD, defaults to today"))
                        .arg(arg!(--notify "Enable notifications").action(ArgAction::SetTrue)),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("delete").arg(arg!(<ID>))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--target <AMOUNT>).required(true))
                        .arg(arg!(--saved <AMOUNT>).default_value("0"))
                        .arg(arg!(--deadline <DATE>).required(true))
                        .arg(arg!(--priority <PRIORITY> "low|medium|high").default_value("medium")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("contribute")
                        .arg(arg!(<ID>))
                        .arg(arg!(--amount <AMOUNT>).required(true)),
                )
                .subcommand(Command::new("delete").arg(arg!(<ID>))),
        )
        .subcommand(
            Command::new("currency")
                .about("Display currency")
                .subcommand(Command::new("set").arg(arg!(<CODE>)))
                .subcommand(Command::new("show"))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand(
                    Command::new("summary")
                        .arg(arg!(--month <MONTH> "YYYY-MM, defaults to this month"))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("categories")
                        .arg(arg!(--month <MONTH> "YYYY-MM, defaults to this month"))
                        .arg(json_flag()),
                )
                .subcommand(Command::new("budgets").arg(json_flag()))
                .subcommand(Command::new("goals").arg(json_flag())),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(arg!(--format <FORMAT> "csv|json").default_value("csv"))
                    .arg(arg!(--out <PATH>).required(true)),
            ),
        )
        .subcommand(
            Command::new("categories")
                .about("List the category catalog")
                .arg(arg!(--kind <KIND> "income|expense"))
                .arg(arg!(--methods "List payment methods instead").action(ArgAction::SetTrue)),
        )
}
