// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use fintrack::models::{Budget, Transaction, TxKind};
use fintrack::state::{decode_collection, decode_settings, fold};
use fintrack::store::CollectionKind;
use fintrack::{FinanceState, Mutation};
use serde_json::json;

#[test]
fn fold_matches_step_by_step_application() {
    let ops = vec![
        Mutation::AddTransaction(tx("a", TxKind::Expense, "10", "food", day(2025, 1, 1))),
        Mutation::AddTransaction(tx("b", TxKind::Income, "99", "salary", day(2025, 1, 2))),
        Mutation::UpdateTransaction(tx("a", TxKind::Expense, "12", "food", day(2025, 1, 1))),
        Mutation::AddGoal(goal("g1", "500", "0")),
        Mutation::AddGoal(goal("g2", "800", "10")),
        Mutation::DeleteTransaction("b".into()),
        Mutation::AddBudget(budget("x", "food", "100")),
        Mutation::DeleteGoal("g1".into()),
    ];
    let folded = fold(FinanceState::default(), ops.clone());

    let mut manual = FinanceState::default();
    for op in ops {
        op.apply(&mut manual);
    }
    assert_eq!(folded, manual);
    assert_eq!(folded.transactions.len(), 1);
    assert_eq!(folded.transactions[0].amount, dec("12"));
    assert_eq!(folded.goals.len(), 1);
    assert_eq!(folded.goals[0].id, "g2");
    assert_eq!(folded.budgets.len(), 1);
}

#[test]
fn transactions_prepend_goals_append() {
    let s = fold(
        FinanceState::default(),
        [
            Mutation::AddTransaction(tx("1", TxKind::Expense, "1", "food", day(2025, 1, 1))),
            Mutation::AddTransaction(tx("2", TxKind::Expense, "1", "food", day(2025, 1, 1))),
            Mutation::AddGoal(goal("a", "1", "0")),
            Mutation::AddGoal(goal("b", "1", "0")),
        ],
    );
    let tx_ids: Vec<&str> = s.transactions.iter().map(|t| t.id.as_str()).collect();
    let goal_ids: Vec<&str> = s.goals.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(tx_ids, ["2", "1"]);
    assert_eq!(goal_ids, ["a", "b"]);
}

#[test]
fn one_budget_per_category_after_any_sequence() {
    let cats = ["food", "transport", "food", "bills", "food", "transport"];
    let ops = cats
        .iter()
        .enumerate()
        .map(|(i, c)| Mutation::AddBudget(budget(&format!("b{}", i), c, "10")));
    let s = fold(FinanceState::default(), ops);
    assert_eq!(s.budgets.len(), 3);
    let food: Vec<&Budget> = s.budgets.iter().filter(|b| b.category == "food").collect();
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].id, "b4");
}

#[test]
fn update_and_delete_of_unknown_ids_are_no_ops() {
    let start = fold(
        FinanceState::default(),
        [Mutation::AddBudget(budget("b1", "food", "10"))],
    );
    let s = fold(
        start.clone(),
        [
            Mutation::UpdateBudget(budget("nope", "food", "99")),
            Mutation::DeleteBudget("nope".into()),
        ],
    );
    assert_eq!(s, start);
}

#[test]
fn non_sequence_snapshots_decode_empty() {
    for v in [json!(null), json!({"a": 1}), json!("text"), json!(3)] {
        let out: Vec<Transaction> = decode_collection(CollectionKind::Transactions, v);
        assert!(out.is_empty());
    }
}

#[test]
fn malformed_and_invalid_elements_are_dropped() {
    let v = json!([
        {"id": "ok", "type": "income", "amount": 5, "category": "gift", "date": "2025-01-01T00:00:00Z"},
        {"id": "bad-kind", "type": "transfer", "amount": 5, "category": "gift", "date": "2025-01-01T00:00:00Z"},
        {"id": "negative", "type": "expense", "amount": -5, "category": "food", "date": "2025-01-01T00:00:00Z"},
        "garbage"
    ]);
    let out: Vec<Transaction> = decode_collection(CollectionKind::Transactions, v);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "ok");
}

#[test]
fn settings_need_a_currency() {
    assert!(decode_settings(json!(null)).is_none());
    assert!(decode_settings(json!({"darkMode": true})).is_none());
    let s = decode_settings(json!({
        "currency": {"code": "INR", "symbol": "₹", "name": "Indian Rupee", "locale": "en-IN"}
    }))
    .unwrap();
    assert!(s.dark_mode);
    assert_eq!(s.currency.code, "INR");
}

#[test]
fn settings_value_carries_constant_dark_mode() {
    let s = FinanceState::default();
    let v = s.collection_value(CollectionKind::Settings).unwrap();
    assert_eq!(v["darkMode"], json!(true));
    assert_eq!(v["currency"]["code"], json!("USD"));
}

#[test]
fn snapshot_with_same_content_reports_no_change() {
    let mut s = FinanceState::default();
    let v = json!([{"id": "g", "name": "n", "targetAmount": 5, "deadline": "2026-01-01T00:00:00Z", "priority": "low"}]);
    assert!(s.apply_snapshot(CollectionKind::Goals, v.clone()));
    assert!(!s.apply_snapshot(CollectionKind::Goals, v));
    assert_eq!(s.goals[0].current_amount, dec("0"));
}
