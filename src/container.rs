// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The state container: sole owner of the signed-in user's data.
//!
//! Identity changes drive a small state machine (signed out / signed in). While signed
//! in, one listener task drains the four store subscriptions and one writer task
//! persists collections in the order local mutations produced them. Mutations apply
//! to memory first and never wait for the store.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::catalog;
use crate::errors::AuthError;
use crate::format;
use crate::identity::{Identity, IdentityProvider};
use crate::models::{Budget, Currency, Goal, Session, Transaction};
use crate::sink::ErrorSink;
use crate::state::{FinanceState, Mutation};
use crate::store::{lock, CollectionKind, RemoteStore, Snapshot};

pub const DEFAULT_LOADING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ContainerOptions {
    pub loading_timeout: Duration,
    pub default_currency: Currency,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            loading_timeout: DEFAULT_LOADING_TIMEOUT,
            default_currency: catalog::default_currency(),
        }
    }
}

enum WriteJob {
    Write { kind: CollectionKind, value: Snapshot },
    Flush(oneshot::Sender<()>),
}

/// Values this session wrote whose echo has not been seen yet, oldest first per kind.
///
/// A store echoes every write back through the subscription. An echo of anything but
/// the newest queued value is older than memory and must not be applied.
#[derive(Debug, Default)]
struct PendingEchoes {
    by_kind: HashMap<CollectionKind, VecDeque<Snapshot>>,
}

impl PendingEchoes {
    fn expect(&mut self, kind: CollectionKind, value: Snapshot) {
        self.by_kind.entry(kind).or_default().push_back(value);
    }

    /// Match a delivery against the queue. Returns false for an echo of one of our
    /// writes that newer queued writes supersede.
    fn accept(&mut self, kind: CollectionKind, snapshot: &Snapshot) -> bool {
        let Some(queue) = self.by_kind.get_mut(&kind) else {
            return true;
        };
        match queue.iter().position(|v| v == snapshot) {
            Some(i) => {
                queue.drain(..=i);
                queue.is_empty()
            }
            None => true,
        }
    }

    /// Drop a value whose write failed; it will never be echoed.
    fn forget(&mut self, kind: CollectionKind, value: &Snapshot) {
        if let Some(queue) = self.by_kind.get_mut(&kind) {
            if let Some(i) = queue.iter().position(|v| v == value) {
                queue.remove(i);
            }
        }
    }
}

type Echoes = Arc<Mutex<PendingEchoes>>;

/// Resources held while an identity is signed in.
struct ActiveSession {
    uid: String,
    listener: JoinHandle<()>,
    writes: mpsc::UnboundedSender<WriteJob>,
    echoes: Echoes,
}

struct Shared {
    state: watch::Sender<FinanceState>,
    store: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityProvider>,
    sink: Arc<dyn ErrorSink>,
    options: ContainerOptions,
    session: Mutex<Option<ActiveSession>>,
    /// Bumped on every session start and end; stale listeners compare against it.
    epoch: AtomicU64,
}

pub struct StateContainer {
    shared: Arc<Shared>,
    driver: JoinHandle<()>,
}

impl StateContainer {
    /// Build the container and start following the identity provider.
    ///
    /// Must be called from within a tokio runtime.
    pub fn create(
        store: Arc<dyn RemoteStore>,
        identity: Arc<dyn IdentityProvider>,
        sink: Arc<dyn ErrorSink>,
        options: ContainerOptions,
    ) -> Self {
        let (state, _) = watch::channel(FinanceState::new(options.default_currency.clone()));
        let identities = identity.identity_changes();
        let shared = Arc::new(Shared {
            state,
            store,
            identity,
            sink,
            options,
            session: Mutex::new(None),
            epoch: AtomicU64::new(0),
        });
        let driver = tokio::spawn(drive(shared.clone(), identities));
        Self { shared, driver }
    }

    /// Stop following identity changes and release every subscription.
    ///
    /// Writes already queued keep going in the background.
    pub async fn shutdown(mut self) {
        self.driver.abort();
        let _ = (&mut self.driver).await;
        self.shared.end_session().await;
        tracing::debug!("state container shut down");
    }

    pub fn state(&self) -> FinanceState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<FinanceState> {
        self.shared.state.subscribe()
    }

    pub fn session(&self) -> Option<Session> {
        self.shared.state.borrow().session.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.shared.state.borrow().transactions.clone()
    }

    pub fn budgets(&self) -> Vec<Budget> {
        self.shared.state.borrow().budgets.clone()
    }

    pub fn goals(&self) -> Vec<Goal> {
        self.shared.state.borrow().goals.clone()
    }

    pub fn currency(&self) -> Currency {
        self.shared.state.borrow().currency.clone()
    }

    /// Resolves once loading has finished (snapshots arrived or the timeout fired).
    pub async fn wait_until_loaded(&self) -> FinanceState {
        let mut rx = self.watch();
        match rx.wait_for(|s| !s.loading).await {
            Ok(s) => s.clone(),
            Err(_) => self.state(),
        }
    }

    /// Resolves once every write queued so far for the current identity has finished.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        let queued = match lock(&self.shared.session).as_ref() {
            Some(active) => active.writes.send(WriteJob::Flush(tx)).is_ok(),
            None => false,
        };
        if queued {
            let _ = rx.await;
        }
    }

    pub fn add_transaction(&self, tx: Transaction) {
        self.apply(Mutation::AddTransaction(tx));
    }

    pub fn update_transaction(&self, tx: Transaction) {
        self.apply(Mutation::UpdateTransaction(tx));
    }

    pub fn delete_transaction(&self, id: &str) {
        self.apply(Mutation::DeleteTransaction(id.to_string()));
    }

    /// Replaces any budget already set for the same category.
    pub fn add_budget(&self, budget: Budget) {
        self.apply(Mutation::AddBudget(budget));
    }

    pub fn update_budget(&self, budget: Budget) {
        self.apply(Mutation::UpdateBudget(budget));
    }

    pub fn delete_budget(&self, id: &str) {
        self.apply(Mutation::DeleteBudget(id.to_string()));
    }

    pub fn add_goal(&self, goal: Goal) {
        self.apply(Mutation::AddGoal(goal));
    }

    pub fn update_goal(&self, goal: Goal) {
        self.apply(Mutation::UpdateGoal(goal));
    }

    pub fn delete_goal(&self, id: &str) {
        self.apply(Mutation::DeleteGoal(id.to_string()));
    }

    /// Add to a goal's saved amount. Returns false if no goal has that id.
    pub fn contribute_to_goal(&self, id: &str, amount: Decimal) -> bool {
        let goal = self
            .shared
            .state
            .borrow()
            .goals
            .iter()
            .find(|g| g.id == id)
            .cloned();
        match goal {
            Some(mut g) => {
                g.current_amount += amount;
                self.update_goal(g);
                true
            }
            None => false,
        }
    }

    /// Apply a mutation in memory and queue the resulting collection for the store.
    pub fn apply(&self, mutation: Mutation) {
        let kind = mutation.kind();
        self.shared.state.send_modify(|s| {
            mutation.apply(s);
            self.shared.persist(s, kind);
        });
    }

    pub fn set_currency(&self, currency: Currency) {
        self.shared.state.send_modify(|s| {
            s.currency = currency;
            self.shared.persist(s, CollectionKind::Settings);
        });
    }

    /// Format an amount in the active currency.
    pub fn format_currency(&self, amount: Decimal) -> String {
        format::format_currency(amount, &self.shared.state.borrow().currency)
    }

    /// Sign out through the identity provider.
    ///
    /// On success every attribute is reset, currency included. On failure the error is
    /// reported and returned, and state is left as it was.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.shared.identity.sign_out().await {
            Ok(()) => {
                self.shared.end_session().await;
                let currency = self.shared.options.default_currency.clone();
                self.shared.state.send_modify(|s| {
                    s.clear_collections();
                    s.currency = currency;
                    s.session = None;
                    s.loading = false;
                    s.syncing = false;
                });
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) => {
                let err = anyhow::anyhow!(e.to_string());
                self.shared.sink.report("sign out", &err);
                Err(e)
            }
        }
    }
}

impl Drop for StateContainer {
    fn drop(&mut self) {
        self.driver.abort();
        if let Some(active) = self.shared.take_session() {
            active.listener.abort();
        }
    }
}

impl Shared {
    fn take_session(&self) -> Option<ActiveSession> {
        lock(&self.session).take()
    }

    fn current_uid(&self) -> Option<String> {
        lock(&self.session).as_ref().map(|s| s.uid.clone())
    }

    /// Queue `kind` from the freshly mutated state for the writer.
    ///
    /// Runs inside the state update, so queue order and echo bookkeeping follow
    /// mutation order.
    fn persist(&self, s: &FinanceState, kind: CollectionKind) {
        if s.session.is_none() || s.syncing {
            tracing::debug!(%kind, "change kept local, not persisted");
            return;
        }
        let value = match s.collection_value(kind) {
            Ok(v) => v,
            Err(e) => {
                self.sink
                    .report(&format!("serialize {}", kind), &anyhow::Error::new(e));
                return;
            }
        };
        let guard = lock(&self.session);
        let Some(active) = guard.as_ref() else {
            tracing::debug!(%kind, "no active session, change not persisted");
            return;
        };
        lock(&active.echoes).expect(kind, value.clone());
        let job = WriteJob::Write { kind, value };
        if let Err(mpsc::error::SendError(WriteJob::Write { value, .. })) = active.writes.send(job)
        {
            lock(&active.echoes).forget(kind, &value);
            tracing::warn!(%kind, "writer gone, change not persisted");
        }
    }

    async fn on_identity(self: &Arc<Self>, identity: Option<Identity>) {
        match identity {
            Some(id) => {
                if self.current_uid().as_deref() == Some(id.uid.as_str()) {
                    let session = Session::from(&id);
                    self.state.send_if_modified(|s| {
                        if s.session.as_ref() == Some(&session) {
                            return false;
                        }
                        s.session = Some(session);
                        true
                    });
                    return;
                }
                if self.end_session().await {
                    self.state.send_modify(|s| s.clear_collections());
                }
                self.begin_session(id);
            }
            None => {
                self.end_session().await;
                self.state.send_modify(|s| {
                    s.clear_collections();
                    s.session = None;
                    s.loading = false;
                    s.syncing = false;
                });
            }
        }
    }

    fn begin_session(self: &Arc<Self>, identity: Identity) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let uid = identity.uid.clone();
        self.state.send_modify(|s| {
            s.session = Some(Session::from(&identity));
            s.loading = true;
            s.syncing = true;
        });

        let feeds: Vec<_> = CollectionKind::ALL
            .into_iter()
            .map(|kind| self.store.subscribe(&uid, kind).map(move |v| (kind, v)))
            .collect();
        let echoes: Echoes = Arc::default();
        let listener = tokio::spawn(listen(self.clone(), epoch, echoes.clone(), feeds));

        let (writes, jobs) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(
            self.store.clone(),
            self.sink.clone(),
            uid.clone(),
            echoes.clone(),
            jobs,
        ));

        tracing::info!(user = %uid, epoch, "session started");
        *lock(&self.session) = Some(ActiveSession {
            uid,
            listener,
            writes,
            echoes,
        });
    }

    /// Release the active session, waiting for its listener to stop. Returns whether
    /// there was one.
    async fn end_session(&self) -> bool {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let Some(active) = self.take_session() else {
            return false;
        };
        active.listener.abort();
        let _ = active.listener.await;
        // Dropping `writes` lets the writer drain what is queued and stop.
        drop(active.writes);
        tracing::info!(user = %active.uid, "session ended");
        true
    }

    /// Apply a snapshot unless the session it belongs to has ended.
    fn deliver(&self, epoch: u64, echoes: &Echoes, kind: CollectionKind, snapshot: Snapshot) {
        self.state.send_if_modified(|s| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            if !lock(echoes).accept(kind, &snapshot) {
                tracing::debug!(%kind, "stale echo of own write, newer writes queued");
                return false;
            }
            s.apply_snapshot(kind, snapshot)
        });
    }

    fn finish_loading(&self, epoch: u64) {
        self.state.send_if_modified(|s| {
            if self.epoch.load(Ordering::SeqCst) != epoch || !s.loading {
                return false;
            }
            s.loading = false;
            s.syncing = false;
            true
        });
    }
}

async fn drive(shared: Arc<Shared>, mut identities: watch::Receiver<Option<Identity>>) {
    loop {
        let identity = identities.borrow_and_update().clone();
        shared.on_identity(identity).await;
        if identities.changed().await.is_err() {
            tracing::debug!("identity provider closed");
            break;
        }
    }
}

async fn listen<S>(shared: Arc<Shared>, epoch: u64, echoes: Echoes, feeds: Vec<S>)
where
    S: futures::Stream<Item = (CollectionKind, Snapshot)> + Unpin + Send,
{
    let mut merged = stream::select_all(feeds);
    let mut pending: Vec<CollectionKind> = CollectionKind::ALL.to_vec();
    let deadline = Instant::now() + shared.options.loading_timeout;
    let mut loading = true;

    loop {
        tokio::select! {
            next = merged.next() => {
                let Some((kind, snapshot)) = next else {
                    tracing::debug!(epoch, "all subscriptions closed by the store");
                    shared.finish_loading(epoch);
                    return;
                };
                shared.deliver(epoch, &echoes, kind, snapshot);
                if loading {
                    pending.retain(|k| *k != kind);
                    if pending.is_empty() {
                        loading = false;
                        shared.finish_loading(epoch);
                    }
                }
            }
            _ = tokio::time::sleep_until(deadline), if loading => {
                tracing::warn!(epoch, missing = ?pending, "initial load timed out");
                loading = false;
                shared.finish_loading(epoch);
            }
        }
    }
}

async fn write_loop(
    store: Arc<dyn RemoteStore>,
    sink: Arc<dyn ErrorSink>,
    uid: String,
    echoes: Echoes,
    mut jobs: mpsc::UnboundedReceiver<WriteJob>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Write { kind, value } => {
                if let Err(e) = store.write(&uid, kind, value.clone()).await {
                    lock(&echoes).forget(kind, &value);
                    sink.report(
                        &format!("persist {} for '{}'", kind, uid),
                        &anyhow::Error::new(e),
                    );
                }
            }
            WriteJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
