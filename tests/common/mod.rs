// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use fintrack::identity::LocalIdentity;
use fintrack::models::{Budget, BudgetPeriod, Goal, Priority, Transaction, TxKind};
use fintrack::sink::RecordingSink;
use fintrack::store::MemoryStore;
use fintrack::{ContainerOptions, FinanceState, StateContainer};
use rust_decimal::Decimal;

pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn tx(id: &str, kind: TxKind, amount: &str, category: &str, date: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.into(),
        kind,
        amount: dec(amount),
        category: category.into(),
        payment_method: "card".into(),
        date,
        description: String::new(),
        tags: Default::default(),
    }
}

pub fn budget(id: &str, category: &str, limit: &str) -> Budget {
    Budget {
        id: id.into(),
        category: category.into(),
        limit: dec(limit),
        period: BudgetPeriod::Monthly,
        start_date: day(2025, 1, 1),
        notifications: false,
    }
}

pub fn goal(id: &str, target: &str, saved: &str) -> Goal {
    Goal {
        id: id.into(),
        name: format!("goal {}", id),
        target_amount: dec(target),
        current_amount: dec(saved),
        deadline: day(2026, 1, 1),
        priority: Priority::Medium,
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub identity: Arc<LocalIdentity>,
    pub sink: Arc<RecordingSink>,
    pub fin: StateContainer,
}

pub fn harness() -> Harness {
    harness_with(ContainerOptions::default())
}

pub fn harness_with(options: ContainerOptions) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(LocalIdentity::new());
    let sink = Arc::new(RecordingSink::new());
    let fin = StateContainer::create(store.clone(), identity.clone(), sink.clone(), options);
    Harness {
        store,
        identity,
        sink,
        fin,
    }
}

/// Wait until the container state satisfies `pred`.
pub async fn settle<F>(fin: &StateContainer, pred: F) -> FinanceState
where
    F: Fn(&FinanceState) -> bool,
{
    let mut rx = fin.watch();
    let state = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(|s| pred(s)))
        .await
        .expect("state never settled")
        .expect("state channel closed");
    state.clone()
}

pub async fn signed_in(fin: &StateContainer, uid: &str) -> FinanceState {
    settle(fin, |s| {
        s.session.as_ref().map(|x| x.uid.as_str()) == Some(uid) && !s.loading
    })
    .await
}
