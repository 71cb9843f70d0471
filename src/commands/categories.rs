// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog;
use crate::models::{Category, TxKind};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if m.get_flag("methods") {
        println!("{}", pretty_table(&["Id", "Name", "Icon"], method_rows()));
        return Ok(());
    }
    let kind = m
        .get_one::<String>("kind")
        .map(|k| k.parse::<TxKind>())
        .transpose()?;
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Kind", "Icon", "Color"], category_rows(kind))
    );
    Ok(())
}

/// Catalog rows, narrowed to one kind when asked.
pub fn category_rows(kind: Option<TxKind>) -> Vec<Vec<String>> {
    let cats: Vec<&Category> = match kind {
        Some(k) => catalog::categories_for(k).collect(),
        None => catalog::categories().iter().collect(),
    };
    cats.into_iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.to_string(),
                c.kind.to_string(),
                c.icon.to_string(),
                c.color.to_string(),
            ]
        })
        .collect()
}

pub fn method_rows() -> Vec<Vec<String>> {
    catalog::payment_methods()
        .iter()
        .map(|p| vec![p.id.to_string(), p.name.to_string(), p.icon.to_string()])
        .collect()
}
