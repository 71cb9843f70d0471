// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard figures derived from a state snapshot. Nothing here touches the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Budget, BudgetPeriod, Goal, Transaction, TxKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub count: usize,
}

pub fn monthly_summary(transactions: &[Transaction], year: i32, month: u32) -> MonthlySummary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut count = 0;
    for t in transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
    {
        count += 1;
        match t.kind {
            TxKind::Income => income += t.amount,
            TxKind::Expense => expense += t.amount,
        }
    }
    MonthlySummary {
        year,
        month,
        income,
        expense,
        balance: income - expense,
        count,
    }
}

/// All-time income minus expense.
pub fn overall_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Expense totals per category within `[from, to)`, largest first.
pub fn spend_by_category(
    transactions: &[Transaction],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == TxKind::Expense && t.date >= from && t.date < to)
    {
        *totals.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut out: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(c, v)| (c.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

pub fn recent_transactions(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

/// Bounds of the budget period containing `now`. Periods repeat from `start_date`;
/// before the start, the first period is returned.
pub fn current_period(budget: &Budget, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = budget.start_date;
    match budget.period {
        BudgetPeriod::Weekly => {
            let week = Duration::days(7);
            let n = if now < start {
                0
            } else {
                (now - start).num_days() / 7
            };
            let begin = start + Duration::days(n * 7);
            (begin, begin + week)
        }
        BudgetPeriod::Monthly => {
            let mut begin = start;
            let mut steps = 0u32;
            while let Some(next) = start.checked_add_months(Months::new(steps + 1)) {
                if next > now {
                    break;
                }
                steps += 1;
                begin = next;
            }
            let end = begin
                .checked_add_months(Months::new(1))
                .unwrap_or(begin + Duration::days(31));
            (begin, end)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    pub budget_id: String,
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Share of the limit spent, in percent, two decimal places.
    pub percent: Decimal,
    pub over_limit: bool,
}

pub fn budget_progress(
    budget: &Budget,
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> BudgetProgress {
    let (from, to) = current_period(budget, now);
    let spent: Decimal = transactions
        .iter()
        .filter(|t| {
            t.kind == TxKind::Expense && t.category == budget.category && t.date >= from && t.date < to
        })
        .map(|t| t.amount)
        .sum();
    let percent = if budget.limit > Decimal::ZERO {
        (spent * Decimal::ONE_HUNDRED / budget.limit).round_dp(2)
    } else {
        Decimal::ZERO
    };
    BudgetProgress {
        budget_id: budget.id.clone(),
        category: budget.category.clone(),
        limit: budget.limit,
        spent,
        remaining: (budget.limit - spent).max(Decimal::ZERO),
        percent,
        over_limit: spent > budget.limit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    /// Percent saved, capped at 100.
    pub percent: Decimal,
    pub remaining: Decimal,
    pub completed: bool,
    /// Whole days until the deadline; negative once it has passed.
    pub days_left: i64,
}

pub fn goal_progress(goal: &Goal, now: DateTime<Utc>) -> GoalProgress {
    let percent = if goal.target_amount > Decimal::ZERO {
        (goal.current_amount * Decimal::ONE_HUNDRED / goal.target_amount)
            .round_dp(2)
            .min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };
    GoalProgress {
        goal_id: goal.id.clone(),
        name: goal.name.clone(),
        percent,
        remaining: (goal.target_amount - goal.current_amount).max(Decimal::ZERO),
        completed: goal.current_amount >= goal.target_amount,
        days_left: (goal.deadline - now).num_days(),
    }
}
