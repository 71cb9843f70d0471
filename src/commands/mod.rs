// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod categories;
pub mod currency;
pub mod exporter;
pub mod goals;
pub mod reports;
pub mod transactions;

use anyhow::{Context, Result};

/// Value of an argument clap already enforces as present.
pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument '{}'", name))
}
