// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory view of one user's finances and the pure operations on it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog;
use crate::models::{Budget, Currency, Goal, Keyed, Session, Settings, Transaction};
use crate::store::{CollectionKind, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SignedOut,
    SignedIn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceState {
    pub session: Option<Session>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub currency: Currency,
    pub loading: bool,
    /// Set from sign-in until the initial load settles; mutations made meanwhile are
    /// not persisted.
    pub syncing: bool,
}

impl Default for FinanceState {
    fn default() -> Self {
        Self::new(catalog::default_currency())
    }
}

impl FinanceState {
    pub fn new(currency: Currency) -> Self {
        Self {
            session: None,
            transactions: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            currency,
            loading: true,
            syncing: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.session.is_some() {
            Phase::SignedIn
        } else {
            Phase::SignedOut
        }
    }

    pub fn clear_collections(&mut self) {
        self.transactions.clear();
        self.budgets.clear();
        self.goals.clear();
    }

    /// Serialized form of one collection, as written to the store.
    pub fn collection_value(&self, kind: CollectionKind) -> serde_json::Result<Value> {
        match kind {
            CollectionKind::Transactions => serde_json::to_value(&self.transactions),
            CollectionKind::Budgets => serde_json::to_value(&self.budgets),
            CollectionKind::Goals => serde_json::to_value(&self.goals),
            CollectionKind::Settings => {
                serde_json::to_value(Settings::with_currency(self.currency.clone()))
            }
        }
    }

    /// Replace an attribute with a delivered snapshot. Returns true if anything changed.
    pub fn apply_snapshot(&mut self, kind: CollectionKind, snapshot: Snapshot) -> bool {
        match kind {
            CollectionKind::Transactions => {
                replace(&mut self.transactions, decode_collection(kind, snapshot))
            }
            CollectionKind::Budgets => replace(&mut self.budgets, decode_collection(kind, snapshot)),
            CollectionKind::Goals => replace(&mut self.goals, decode_collection(kind, snapshot)),
            CollectionKind::Settings => match decode_settings(snapshot) {
                Some(settings) => replace(&mut self.currency, settings.currency),
                None => false,
            },
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Elements a snapshot may carry, with their own validity check.
pub trait Validated {
    fn is_valid(&self) -> bool;
}

impl Validated for Transaction {
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Validated for Budget {
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Validated for Goal {
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Decode a sequence snapshot. Anything that is not an array becomes empty;
/// elements that fail to decode or validate are dropped.
pub fn decode_collection<T>(kind: CollectionKind, snapshot: Snapshot) -> Vec<T>
where
    T: DeserializeOwned + Validated,
{
    let items = match snapshot {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => {
            tracing::warn!(%kind, found = json_type(&other), "snapshot is not a sequence, using empty");
            return Vec::new();
        }
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(v) if v.is_valid() => out.push(v),
            Ok(_) => tracing::warn!(%kind, index = i, "dropping invalid element"),
            Err(e) => tracing::warn!(%kind, index = i, error = %e, "dropping malformed element"),
        }
    }
    out
}

pub fn decode_settings(snapshot: Snapshot) -> Option<Settings> {
    if snapshot.is_null() {
        return None;
    }
    match serde_json::from_value::<Settings>(snapshot) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(error = %e, "settings snapshot without a usable currency");
            None
        }
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A local change to one of the three mutable collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddTransaction(Transaction),
    UpdateTransaction(Transaction),
    DeleteTransaction(String),
    AddBudget(Budget),
    UpdateBudget(Budget),
    DeleteBudget(String),
    AddGoal(Goal),
    UpdateGoal(Goal),
    DeleteGoal(String),
}

impl Mutation {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::AddTransaction(_) | Self::UpdateTransaction(_) | Self::DeleteTransaction(_) => {
                CollectionKind::Transactions
            }
            Self::AddBudget(_) | Self::UpdateBudget(_) | Self::DeleteBudget(_) => {
                CollectionKind::Budgets
            }
            Self::AddGoal(_) | Self::UpdateGoal(_) | Self::DeleteGoal(_) => CollectionKind::Goals,
        }
    }

    pub fn apply(self, state: &mut FinanceState) {
        match self {
            Self::AddTransaction(tx) => state.transactions.insert(0, tx),
            Self::UpdateTransaction(tx) => replace_by_id(&mut state.transactions, tx),
            Self::DeleteTransaction(id) => remove_by_id(&mut state.transactions, &id),
            Self::AddBudget(b) => {
                state.budgets.retain(|old| old.category != b.category);
                state.budgets.push(b);
            }
            Self::UpdateBudget(b) => replace_by_id(&mut state.budgets, b),
            Self::DeleteBudget(id) => remove_by_id(&mut state.budgets, &id),
            Self::AddGoal(g) => state.goals.push(g),
            Self::UpdateGoal(g) => replace_by_id(&mut state.goals, g),
            Self::DeleteGoal(id) => remove_by_id(&mut state.goals, &id),
        }
    }
}

fn replace_by_id<T: Keyed>(items: &mut [T], item: T) {
    if let Some(slot) = items.iter_mut().find(|x| x.id() == item.id()) {
        *slot = item;
    }
}

fn remove_by_id<T: Keyed>(items: &mut Vec<T>, id: &str) {
    items.retain(|x| x.id() != id);
}

/// Apply mutations in order.
pub fn fold<I>(mut state: FinanceState, mutations: I) -> FinanceState
where
    I: IntoIterator<Item = Mutation>,
{
    for m in mutations {
        m.apply(&mut state);
    }
    state
}

