// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::required;
use crate::container::StateContainer;
use crate::models::{Goal, Priority};
use crate::utils::{maybe_print_json, new_id, parse_day, parse_decimal, pretty_table};

pub fn handle(fin: &StateContainer, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(fin, sub)?,
        Some(("list", sub)) => list(fin, sub)?,
        Some(("contribute", sub)) => contribute(fin, sub)?,
        Some(("delete", sub)) => delete(fin, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let priority: Priority = required(sub, "priority")?.parse()?;
    let goal = Goal {
        id: new_id(),
        name: required(sub, "name")?.to_string(),
        target_amount: parse_decimal(required(sub, "target")?)?,
        current_amount: parse_decimal(required(sub, "saved")?)?,
        deadline: parse_day(required(sub, "deadline")?)?,
        priority,
    };
    goal.validate()?;
    println!(
        "Goal '{}' added: {} by {} (id: {})",
        goal.name,
        fin.format_currency(goal.target_amount),
        goal.deadline.format("%Y-%m-%d"),
        goal.id
    );
    fin.add_goal(goal);
    Ok(())
}

fn list(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let goals = fin.goals();
    if maybe_print_json(sub.get_flag("json"), &goals)? {
        return Ok(());
    }
    let data = goals
        .iter()
        .map(|g| {
            vec![
                g.name.clone(),
                fin.format_currency(g.current_amount),
                fin.format_currency(g.target_amount),
                g.deadline.format("%Y-%m-%d").to_string(),
                g.priority.as_str().to_string(),
                g.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Goal", "Saved", "Target", "Deadline", "Priority", "Id"], data)
    );
    Ok(())
}

fn contribute(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "ID")?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    if amount <= rust_decimal::Decimal::ZERO {
        anyhow::bail!("Contribution must be positive, got {}", amount);
    }
    if !fin.contribute_to_goal(id, amount) {
        anyhow::bail!("Goal '{}' not found", id);
    }
    println!("Added {} to goal {}", fin.format_currency(amount), id);
    Ok(())
}

fn delete(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "ID")?;
    if !fin.goals().iter().any(|g| g.id == id) {
        anyhow::bail!("Goal '{}' not found", id);
    }
    fin.delete_goal(id);
    println!("Deleted goal {}", id);
    Ok(())
}
