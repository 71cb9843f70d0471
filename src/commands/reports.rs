// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, Utc};

use crate::catalog;
use crate::container::StateContainer;
use crate::reports::{budget_progress, goal_progress, monthly_summary, overall_balance, spend_by_category};
use crate::utils::{maybe_print_json, month_bounds, parse_month, pretty_table};

pub fn handle(fin: &StateContainer, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(fin, sub)?,
        Some(("categories", sub)) => categories(fin, sub)?,
        Some(("budgets", sub)) => budgets(fin, sub)?,
        Some(("goals", sub)) => goals(fin, sub)?,
        _ => {}
    }
    Ok(())
}

fn selected_month(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => {
            let now = Utc::now();
            Ok((now.year(), now.month()))
        }
    }
}

fn summary(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = selected_month(sub)?;
    let txs = fin.transactions();
    let s = monthly_summary(&txs, year, month);
    if maybe_print_json(sub.get_flag("json"), &s)? {
        return Ok(());
    }
    let data = vec![
        vec!["Income".to_string(), fin.format_currency(s.income)],
        vec!["Expense".to_string(), fin.format_currency(s.expense)],
        vec!["Balance".to_string(), fin.format_currency(s.balance)],
        vec!["Transactions".to_string(), s.count.to_string()],
        vec![
            "All-time balance".to_string(),
            fin.format_currency(overall_balance(&txs)),
        ],
    ];
    let title = format!("{:04}-{:02}", year, month);
    println!("{}", pretty_table(&[title.as_str(), "Value"], data));
    Ok(())
}

fn categories(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = selected_month(sub)?;
    let (from, to) = month_bounds(year, month)?;
    let rows = spend_by_category(&fin.transactions(), from, to);
    if maybe_print_json(sub.get_flag("json"), &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|(c, v)| vec![catalog::category_name(c).to_string(), fin.format_currency(*v)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], data));
    Ok(())
}

fn budgets(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let state = fin.state();
    let now = Utc::now();
    let progress: Vec<_> = state
        .budgets
        .iter()
        .map(|b| budget_progress(b, &state.transactions, now))
        .collect();
    if maybe_print_json(sub.get_flag("json"), &progress)? {
        return Ok(());
    }
    let data = progress
        .iter()
        .map(|p| {
            vec![
                catalog::category_name(&p.category).to_string(),
                fin.format_currency(p.spent),
                fin.format_currency(p.limit),
                format!("{}%", p.percent),
                if p.over_limit { "OVER" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Limit", "Used", ""], data)
    );
    Ok(())
}

fn goals(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let now = Utc::now();
    let progress: Vec<_> = fin.goals().iter().map(|g| goal_progress(g, now)).collect();
    if maybe_print_json(sub.get_flag("json"), &progress)? {
        return Ok(());
    }
    let data = progress
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                format!("{}%", p.percent),
                fin.format_currency(p.remaining),
                p.days_left.to_string(),
                if p.completed { "done" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Goal", "Saved", "Remaining", "Days left", ""], data)
    );
    Ok(())
}
