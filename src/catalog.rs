// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed, process-wide catalogs: categories, payment methods and currencies.

use once_cell::sync::Lazy;

use crate::models::{Category, Currency, PaymentMethod, TxKind};

pub const UNKNOWN: &str = "Unknown";

static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    let cat = |id, name, icon, color, kind| Category {
        id,
        name,
        icon,
        color,
        kind,
    };
    vec![
        cat("salary", "Salary", "briefcase", "emerald", TxKind::Income),
        cat("freelance", "Freelance", "laptop", "teal", TxKind::Income),
        cat("investment", "Investment", "trending-up", "cyan", TxKind::Income),
        cat("gift", "Gift", "gift", "pink", TxKind::Income),
        cat("other-income", "Other Income", "plus-circle", "lime", TxKind::Income),
        cat("food", "Food & Dining", "utensils", "orange", TxKind::Expense),
        cat("transport", "Transport", "car", "blue", TxKind::Expense),
        cat("shopping", "Shopping", "shopping-bag", "purple", TxKind::Expense),
        cat("entertainment", "Entertainment", "film", "red", TxKind::Expense),
        cat("bills", "Bills & Utilities", "file-text", "yellow", TxKind::Expense),
        cat("health", "Health", "heart", "rose", TxKind::Expense),
        cat("education", "Education", "book", "indigo", TxKind::Expense),
        cat("travel", "Travel", "plane", "sky", TxKind::Expense),
        cat("other", "Other", "more-horizontal", "gray", TxKind::Expense),
    ]
});

static PAYMENT_METHODS: Lazy<Vec<PaymentMethod>> = Lazy::new(|| {
    vec![
        PaymentMethod { id: "cash", name: "Cash", icon: "banknote" },
        PaymentMethod { id: "card", name: "Card", icon: "credit-card" },
        PaymentMethod { id: "bank", name: "Bank Transfer", icon: "landmark" },
        PaymentMethod { id: "mobile", name: "Mobile Wallet", icon: "smartphone" },
    ]
});

static CURRENCIES: Lazy<Vec<Currency>> = Lazy::new(|| {
    let ccy = |code: &str, symbol: &str, name: &str, locale: &str| Currency {
        code: code.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        locale: locale.to_string(),
    };
    vec![
        ccy("USD", "$", "US Dollar", "en-US"),
        ccy("EUR", "€", "Euro", "de-DE"),
        ccy("GBP", "£", "British Pound", "en-GB"),
        ccy("JPY", "¥", "Japanese Yen", "ja-JP"),
        ccy("INR", "₹", "Indian Rupee", "en-IN"),
        ccy("CAD", "$", "Canadian Dollar", "en-CA"),
        ccy("AUD", "$", "Australian Dollar", "en-AU"),
        ccy("CNY", "¥", "Chinese Yuan", "zh-CN"),
        ccy("CHF", "CHF", "Swiss Franc", "de-CH"),
        ccy("BRL", "R$", "Brazilian Real", "pt-BR"),
    ]
});

pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

pub fn categories_for(kind: TxKind) -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(move |c| c.kind == kind)
}

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Display name for a category reference; dangling references render as "Unknown".
pub fn category_name(id: &str) -> &'static str {
    category(id).map(|c| c.name).unwrap_or(UNKNOWN)
}

pub fn payment_methods() -> &'static [PaymentMethod] {
    &PAYMENT_METHODS
}

pub fn payment_method_name(id: &str) -> &'static str {
    PAYMENT_METHODS
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name)
        .unwrap_or(UNKNOWN)
}

pub fn currencies() -> &'static [Currency] {
    &CURRENCIES
}

pub fn currency(code: &str) -> Option<Currency> {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .cloned()
}

pub fn default_currency() -> Currency {
    CURRENCIES[0].clone()
}
