// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use fintrack::commands::exporter::export_transactions;
use fintrack::models::TxKind;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn export_transactions_writes_pretty_json_oldest_first() {
    let mut later = tx("t2", TxKind::Expense, "12.34", "food", day(2025, 1, 2));
    later.description = "Weekly run".into();
    later.tags.insert("groceries".into());
    let earlier = tx("t1", TxKind::Income, "100", "gift", day(2025, 1, 1));

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export_transactions(&[later, earlier], "json", &out_path).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed[0]["id"], json!("t1"));
    assert_eq!(
        parsed[1],
        json!({
            "id": "t2",
            "date": "2025-01-02T00:00:00+00:00",
            "kind": "expense",
            "amount": "12.34",
            "category": "Food & Dining",
            "method": "Card",
            "description": "Weekly run",
            "tags": ["groceries"]
        })
    );
}

#[test]
fn export_transactions_writes_csv() {
    let mut t = tx("t1", TxKind::Expense, "9.99", "ghost-category", day(2025, 2, 1));
    t.tags.insert("a".into());
    t.tags.insert("b".into());

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export_transactions(&[t], "csv", &out_path).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,date,kind,amount,category,method,description,tags"
    );
    assert_eq!(
        lines.next().unwrap(),
        "t1,2025-02-01T00:00:00+00:00,expense,9.99,Unknown,Card,,a;b"
    );
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(export_transactions(&[], "xml", &out_path).is_err());
    assert!(!out_path.exists());
}
