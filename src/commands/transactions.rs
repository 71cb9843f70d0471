// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use serde::Serialize;

use super::required;
use crate::catalog;
use crate::container::StateContainer;
use crate::models::{Transaction, TxKind};
use crate::utils::{maybe_print_json, new_id, parse_day, parse_decimal, parse_month, pretty_table};

pub fn handle(fin: &StateContainer, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(fin, sub)?,
        Some(("list", sub)) => list(fin, sub)?,
        Some(("update", sub)) => update(fin, sub)?,
        Some(("delete", sub)) => delete(fin, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TxKind = required(sub, "kind")?.parse()?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = required(sub, "category")?.to_string();
    if catalog::category(&category).is_none() {
        tracing::warn!(%category, "category not in catalog, will show as Unknown");
    }
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_day(d)?,
        None => Utc::now(),
    };
    let tags: BTreeSet<String> = sub
        .get_many::<String>("tag")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    let tx = Transaction {
        id: new_id(),
        kind,
        amount,
        category,
        payment_method: sub
            .get_one::<String>("method")
            .cloned()
            .unwrap_or_else(|| "cash".into()),
        date,
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
        tags,
    };
    tx.validate()?;
    let id = tx.id.clone();
    fin.add_transaction(tx);
    println!(
        "Recorded {} {} in {} (id: {})",
        kind,
        fin.format_currency(amount),
        catalog::category_name(required(sub, "category")?),
        id
    );
    Ok(())
}

fn update(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "ID")?;
    let mut tx = fin
        .transactions()
        .into_iter()
        .find(|t| t.id == id)
        .with_context(|| format!("Transaction '{}' not found", id))?;
    if let Some(k) = sub.get_one::<String>("kind") {
        tx.kind = k.parse()?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = parse_decimal(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category = c.clone();
    }
    if let Some(p) = sub.get_one::<String>("method") {
        tx.payment_method = p.clone();
    }
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_day(d)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        tx.description = d.clone();
    }
    tx.validate()?;
    fin.update_transaction(tx);
    println!("Updated transaction {}", id);
    Ok(())
}

fn delete(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "ID")?;
    if !fin.transactions().iter().any(|t| t.id == id) {
        anyhow::bail!("Transaction '{}' not found", id);
    }
    fin.delete_transaction(id);
    println!("Deleted transaction {}", id);
    Ok(())
}

fn list(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let data = query_rows(fin, sub)?;
    if !maybe_print_json(json_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.method.clone(),
                    r.description.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "Amount", "Category", "Method", "Description", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub method: String,
    pub description: String,
}

/// Rows for `tx list`, newest first, after month/category/limit filters.
pub fn query_rows(fin: &StateContainer, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let category = sub.get_one::<String>("category");

    let mut txs: Vec<Transaction> = fin
        .transactions()
        .into_iter()
        .filter(|t| month.is_none_or(|(y, m)| t.date.year() == y && t.date.month() == m))
        .filter(|t| category.is_none_or(|c| &t.category == c))
        .collect();
    txs.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            date: t.date.format("%Y-%m-%d").to_string(),
            kind: t.kind.to_string(),
            amount: fin.format_currency(t.signed_amount()),
            category: catalog::category_name(&t.category).to_string(),
            method: catalog::payment_method_name(&t.payment_method).to_string(),
            description: t.description,
            id: t.id,
        })
        .collect())
}
