// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Currency;

/// Separator and symbol placement conventions for a locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleRules {
    group: &'static str,
    decimal: &'static str,
    symbol_after: bool,
    symbol_gap: &'static str,
    indian_grouping: bool,
}

const EN: LocaleRules = LocaleRules {
    group: ",",
    decimal: ".",
    symbol_after: false,
    symbol_gap: "",
    indian_grouping: false,
};

fn rules_for(locale: &str) -> LocaleRules {
    let tag = locale.replace('_', "-").to_ascii_lowercase();
    let (lang, region) = match tag.split_once('-') {
        Some((l, r)) => (l.to_string(), r.to_string()),
        None => (tag.clone(), String::new()),
    };
    match (lang.as_str(), region.as_str()) {
        ("en", "in") | ("hi", _) => LocaleRules {
            indian_grouping: true,
            ..EN
        },
        ("de", "ch") => LocaleRules {
            group: "’",
            decimal: ".",
            symbol_after: false,
            symbol_gap: "\u{a0}",
            indian_grouping: false,
        },
        ("de", _) | ("es", _) | ("it", _) | ("nl", _) => LocaleRules {
            group: ".",
            decimal: ",",
            symbol_after: true,
            symbol_gap: "\u{a0}",
            indian_grouping: false,
        },
        ("fr", _) => LocaleRules {
            group: "\u{202f}",
            decimal: ",",
            symbol_after: true,
            symbol_gap: "\u{a0}",
            indian_grouping: false,
        },
        ("pt", "br") => LocaleRules {
            group: ".",
            decimal: ",",
            symbol_after: false,
            symbol_gap: "\u{a0}",
            indian_grouping: false,
        },
        _ => EN,
    }
}

/// Minor-unit digits shown for a currency code.
pub fn fraction_digits(code: &str) -> u32 {
    match code.to_ascii_uppercase().as_str() {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
        _ => 2,
    }
}

fn group_digits(int_part: &str, rules: &LocaleRules) -> String {
    let digits: Vec<char> = int_part.chars().collect();
    let mut out = String::new();
    let n = digits.len();
    for (i, ch) in digits.iter().enumerate() {
        let remaining = n - i;
        if i > 0 {
            let boundary = if rules.indian_grouping {
                remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)
            } else {
                remaining % 3 == 0
            };
            if boundary {
                out.push_str(rules.group);
            }
        }
        out.push(*ch);
    }
    out
}

/// Format `amount` in `currency` using the currency's locale tag.
///
/// Pure: depends only on its two arguments.
pub fn format_currency(amount: Decimal, currency: &Currency) -> String {
    let rules = rules_for(&currency.locale);
    let dp = fraction_digits(&currency.code);
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text.clone(), None),
    };

    let mut number = group_digits(&int_part, &rules);
    if let Some(frac) = frac_part {
        number.push_str(rules.decimal);
        number.push_str(&frac);
    }

    let symbol = if currency.symbol.is_empty() {
        currency.code.as_str()
    } else {
        currency.symbol.as_str()
    };
    let body = if rules.symbol_after {
        format!("{}{}{}", number, rules.symbol_gap, symbol)
    } else {
        format!("{}{}{}", symbol, rules.symbol_gap, number)
    };
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}
