// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;

use super::required;
use crate::catalog;
use crate::container::StateContainer;
use crate::errors::ValidationError;
use crate::format::format_currency;
use crate::utils::pretty_table;

pub fn handle(fin: &StateContainer, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let code = required(sub, "CODE")?.to_uppercase();
            let ccy = catalog::currency(&code).ok_or(ValidationError::UnknownCurrency(code))?;
            println!("Currency set to {} ({})", ccy.code, ccy.name);
            fin.set_currency(ccy);
        }
        Some(("show", _)) => {
            let ccy = fin.currency();
            println!(
                "{} {} ({}), e.g. {}",
                ccy.code,
                ccy.symbol,
                ccy.locale,
                fin.format_currency(Decimal::new(123456789, 2))
            );
        }
        Some(("list", _)) => {
            let sample = Decimal::new(123456789, 2);
            let data = catalog::currencies()
                .iter()
                .map(|c| {
                    vec![
                        c.code.clone(),
                        c.name.clone(),
                        c.locale.clone(),
                        format_currency(sample, c),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Code", "Name", "Locale", "Example"], data)
            );
        }
        _ => {}
    }
    Ok(())
}
