// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use super::required;
use crate::catalog;
use crate::container::StateContainer;
use crate::models::{Budget, BudgetPeriod};
use crate::utils::{maybe_print_json, new_id, parse_day, parse_decimal, pretty_table};

pub fn handle(fin: &StateContainer, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(fin, sub)?,
        Some(("list", sub)) => list(fin, sub)?,
        Some(("delete", sub)) => delete(fin, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let category = required(sub, "category")?.to_string();
    let limit = parse_decimal(required(sub, "limit")?)?;
    let period: BudgetPeriod = required(sub, "period")?.parse()?;
    let start_date = match sub.get_one::<String>("start") {
        Some(d) => parse_day(d)?,
        None => Utc::now(),
    };
    let budget = Budget {
        id: new_id(),
        category,
        limit,
        period,
        start_date,
        notifications: sub.get_flag("notify"),
    };
    budget.validate()?;
    println!(
        "Budget set for {} = {} {}",
        catalog::category_name(&budget.category),
        fin.format_currency(limit),
        period.as_str()
    );
    fin.add_budget(budget);
    Ok(())
}

fn list(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = fin.budgets();
    if maybe_print_json(sub.get_flag("json"), &budgets)? {
        return Ok(());
    }
    let data = budgets
        .iter()
        .map(|b| {
            vec![
                catalog::category_name(&b.category).to_string(),
                fin.format_currency(b.limit),
                b.period.as_str().to_string(),
                b.start_date.format("%Y-%m-%d").to_string(),
                if b.notifications { "on" } else { "off" }.to_string(),
                b.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Limit", "Period", "Start", "Notify", "Id"], data)
    );
    Ok(())
}

fn delete(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "ID")?;
    if !fin.budgets().iter().any(|b| b.id == id) {
        anyhow::bail!("Budget '{}' not found", id);
    }
    fin.delete_budget(id);
    println!("Deleted budget {}", id);
    Ok(())
}
