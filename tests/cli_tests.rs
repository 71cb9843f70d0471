// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use fintrack::cli;
use fintrack::commands::{budgets, categories, goals, transactions};
use fintrack::identity::Identity;
use fintrack::models::TxKind;

#[tokio::test]
async fn list_limit_and_month_respected() {
    let h = harness();
    h.identity.sign_in(Identity::new("u1"));
    signed_in(&h.fin, "u1").await;
    for i in 1..=3 {
        h.fin.add_transaction(tx(
            &format!("t{}", i),
            TxKind::Expense,
            "10",
            "food",
            day(2025, 1, i),
        ));
    }
    h.fin
        .add_transaction(tx("feb", TxKind::Expense, "10", "food", day(2025, 2, 1)));

    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "list", "--month", "2025-01", "--limit", "2",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&h.fin, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].amount, "-$10.00");
    assert_eq!(rows[0].category, "Food & Dining");
}

#[tokio::test]
async fn tx_add_validates_and_records() {
    let h = harness();
    h.identity.sign_in(Identity::new("u1"));
    signed_in(&h.fin, "u1").await;

    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "add", "--kind", "income", "--amount", "250.00", "--category",
        "freelance", "--date", "2025-05-01", "--tag", "client-a", "--tag", "q2",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&h.fin, tx_m).unwrap();
    let txs = h.fin.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TxKind::Income);
    assert_eq!(txs[0].amount, dec("250"));
    assert_eq!(txs[0].tags.len(), 2);
    assert_eq!(txs[0].date, day(2025, 5, 1));

    let bad = cli::build_cli().get_matches_from([
        "fintrack", "tx", "add", "--kind", "expense", "--amount=-4", "--category", "food",
    ]);
    let Some(("tx", bad_m)) = bad.subcommand() else {
        panic!("no tx subcommand");
    };
    assert!(transactions::handle(&h.fin, bad_m).is_err());
    assert_eq!(h.fin.transactions().len(), 1);
}

#[tokio::test]
async fn budget_set_twice_keeps_one_per_category() {
    let h = harness();
    h.identity.sign_in(Identity::new("u1"));
    signed_in(&h.fin, "u1").await;

    for limit in ["100", "150"] {
        let m = cli::build_cli().get_matches_from([
            "fintrack", "budget", "set", "--category", "food", "--limit", limit, "--period",
            "weekly",
        ]);
        let Some(("budget", b_m)) = m.subcommand() else {
            panic!("no budget subcommand");
        };
        budgets::handle(&h.fin, b_m).unwrap();
    }
    let bs = h.fin.budgets();
    assert_eq!(bs.len(), 1);
    assert_eq!(bs[0].limit, dec("150"));
}

#[tokio::test]
async fn goal_contribute_requires_existing_goal() {
    let h = harness();
    h.identity.sign_in(Identity::new("u1"));
    signed_in(&h.fin, "u1").await;
    h.fin.add_goal(goal("g1", "100", "0"));

    let m = cli::build_cli().get_matches_from([
        "fintrack", "goal", "contribute", "g1", "--amount", "40",
    ]);
    let Some(("goal", g_m)) = m.subcommand() else {
        panic!("no goal subcommand");
    };
    goals::handle(&h.fin, g_m).unwrap();
    assert_eq!(h.fin.goals()[0].current_amount, dec("40"));

    let m = cli::build_cli().get_matches_from([
        "fintrack", "goal", "contribute", "nope", "--amount", "40",
    ]);
    let Some(("goal", g_m)) = m.subcommand() else {
        panic!("no goal subcommand");
    };
    assert!(goals::handle(&h.fin, g_m).is_err());
}

#[test]
fn global_user_flag_parses_after_subcommand() {
    let m = cli::build_cli().get_matches_from(["fintrack", "report", "summary", "--user", "ada"]);
    assert_eq!(m.get_one::<String>("user").map(String::as_str), Some("ada"));
}

#[test]
fn categories_filter_by_kind_and_list_methods() {
    let m = cli::build_cli().get_matches_from(["fintrack", "categories", "--kind", "income"]);
    let Some(("categories", sub)) = m.subcommand() else {
        panic!("no categories subcommand");
    };
    assert!(!sub.get_flag("methods"));
    let kind = sub.get_one::<String>("kind").unwrap().parse::<TxKind>().unwrap();

    let income = categories::category_rows(Some(kind));
    assert_eq!(income.len(), 5);
    assert!(income.iter().all(|r| r[2] == "income"));
    assert_eq!(categories::category_rows(Some(TxKind::Expense)).len(), 9);
    assert_eq!(categories::category_rows(None).len(), 14);

    let methods = categories::method_rows();
    let ids: Vec<&str> = methods.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, ["cash", "card", "bank", "mobile"]);
}
