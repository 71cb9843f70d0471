// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use super::required;
use crate::catalog;
use crate::container::StateContainer;
use crate::models::Transaction;

pub fn handle(fin: &StateContainer, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = required(sub, "format")?.to_lowercase();
            let out = required(sub, "out")?;
            export_transactions(&fin.transactions(), &fmt, Path::new(out))?;
            println!("Exported transactions to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Write transactions oldest first as `csv` or `json`.
pub fn export_transactions(txs: &[Transaction], fmt: &str, out: &Path) -> Result<()> {
    let mut rows: Vec<&Transaction> = txs.iter().collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record([
                "id", "date", "kind", "amount", "category", "method", "description", "tags",
            ])?;
            for t in rows {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_rfc3339(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    catalog::category_name(&t.category).to_string(),
                    catalog::payment_method_name(&t.payment_method).to_string(),
                    t.description.clone(),
                    t.tags.iter().cloned().collect::<Vec<_>>().join(";"),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.date.to_rfc3339(),
                        "kind": t.kind,
                        "amount": t.amount.to_string(),
                        "category": catalog::category_name(&t.category),
                        "method": catalog::payment_method_name(&t.payment_method),
                        "description": t.description,
                        "tags": t.tags,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => anyhow::bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
