// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote store contract and the in-process implementation.
//!
//! A store keeps one JSON document per (user, collection). Subscribing hands back a
//! [`Snapshots`] channel which receives the current document first and then every
//! replacement. Dropping the channel releases the subscription.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::errors::StoreError;

/// Full replacement value for a collection. `Value::Null` means no document yet.
pub type Snapshot = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    Transactions,
    Budgets,
    Goals,
    Settings,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Transactions,
        CollectionKind::Budgets,
        CollectionKind::Goals,
        CollectionKind::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::Goals => "goals",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown collection '{}'", s))
    }
}

/// Receiving half of a subscription.
#[derive(Debug)]
pub struct Snapshots {
    rx: mpsc::UnboundedReceiver<Snapshot>,
}

/// Producing half of a subscription, held by the store.
#[derive(Debug, Clone)]
pub struct SnapshotSender {
    tx: mpsc::UnboundedSender<Snapshot>,
}

impl Snapshots {
    pub fn channel() -> (SnapshotSender, Snapshots) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SnapshotSender { tx }, Snapshots { rx })
    }

    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

impl Stream for Snapshots {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Snapshot>> {
        self.rx.poll_recv(cx)
    }
}

impl SnapshotSender {
    /// Returns false once the subscriber has released its end.
    pub fn deliver(&self, snapshot: Snapshot) -> bool {
        self.tx.send(snapshot).is_ok()
    }

    pub fn is_released(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn subscribe(&self, user_id: &str, kind: CollectionKind) -> Snapshots;

    /// Overwrite the whole collection for `user_id`.
    async fn write(
        &self,
        user_id: &str,
        kind: CollectionKind,
        value: Snapshot,
    ) -> Result<(), StoreError>;
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

type SubscriberKey = (String, CollectionKind);

/// Fan-out table shared by the store implementations.
#[derive(Debug, Default)]
pub struct Subscribers {
    inner: Mutex<HashMap<SubscriberKey, Vec<SnapshotSender>>>,
}

impl Subscribers {
    /// Register a subscriber, delivering `current` first when given.
    ///
    /// Senders whose subscriber went away are swept here too, so keys nobody writes to
    /// again do not hold on to them.
    pub fn add(&self, user_id: &str, kind: CollectionKind, current: Option<Snapshot>) -> Snapshots {
        let (tx, rx) = Snapshots::channel();
        if let Some(value) = current {
            tx.deliver(value);
        }
        let mut map = lock(&self.inner);
        map.retain(|_, senders| {
            senders.retain(|s| !s.is_released());
            !senders.is_empty()
        });
        map.entry((user_id.to_string(), kind)).or_default().push(tx);
        rx
    }

    pub fn publish(&self, user_id: &str, kind: CollectionKind, value: &Snapshot) {
        let mut map = lock(&self.inner);
        let key = (user_id.to_string(), kind);
        if let Some(senders) = map.get_mut(&key) {
            senders.retain(|s| s.deliver(value.clone()));
            if senders.is_empty() {
                map.remove(&key);
            }
        }
    }

    /// Live subscriptions for (user, kind); released ones are not counted.
    pub fn count(&self, user_id: &str, kind: CollectionKind) -> usize {
        lock(&self.inner)
            .get(&(user_id.to_string(), kind))
            .map(|v| v.iter().filter(|s| !s.is_released()).count())
            .unwrap_or(0)
    }

    /// Senders still held, released or not.
    pub fn retained(&self) -> usize {
        lock(&self.inner).values().map(Vec::len).sum()
    }
}

/// In-process store. Used by tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<SubscriberKey, Snapshot>>,
    subscribers: Subscribers,
    fail_writes: AtomicBool,
    silent: AtomicBool,
    writes: AtomicUsize,
    write_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// New subscriptions receive nothing, not even the current document.
    pub fn set_silent(&self, silent: bool) {
        self.silent.store(silent, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Option<Duration>) {
        *lock(&self.write_delay) = delay;
    }

    /// Change a document as another device would, notifying subscribers.
    pub fn push(&self, user_id: &str, kind: CollectionKind, value: Snapshot) {
        lock(&self.docs).insert((user_id.to_string(), kind), value.clone());
        if !self.silent.load(Ordering::SeqCst) {
            self.subscribers.publish(user_id, kind, &value);
        }
    }

    pub fn document(&self, user_id: &str, kind: CollectionKind) -> Option<Snapshot> {
        lock(&self.docs).get(&(user_id.to_string(), kind)).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self, user_id: &str, kind: CollectionKind) -> usize {
        self.subscribers.count(user_id, kind)
    }

    pub fn retained_senders(&self) -> usize {
        self.subscribers.retained()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    fn subscribe(&self, user_id: &str, kind: CollectionKind) -> Snapshots {
        if self.silent.load(Ordering::SeqCst) {
            return self.subscribers.add(user_id, kind, None);
        }
        let current = self.document(user_id, kind).unwrap_or(Value::Null);
        self.subscribers.add(user_id, kind, Some(current))
    }

    async fn write(
        &self,
        user_id: &str,
        kind: CollectionKind,
        value: Snapshot,
    ) -> Result<(), StoreError> {
        let delay = *lock(&self.write_delay);
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "write of {} for '{}' refused",
                kind, user_id
            )));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.push(user_id, kind, value);
        Ok(())
    }
}
