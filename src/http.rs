// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Store backed by a realtime-database style REST endpoint.
//!
//! Documents live at `{base}/users/{uid}/{kind}.json`. Writes are `PUT`s of the whole
//! collection; subscriptions poll with `GET` and deliver only when the body changes.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde_json::Value;

use crate::errors::StoreError;
use crate::store::{CollectionKind, RemoteStore, Snapshot, Snapshots};

const UA: &str = concat!("fintrack/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
    poll_interval: Duration,
}

impl HttpStore {
    pub fn new(base_url: &str, auth_token: Option<String>, poll_interval: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid store URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Store URL '{}' cannot carry a path", base_url);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(UA)
            .build()?;
        Ok(Self {
            client,
            base_url,
            auth_token,
            poll_interval,
        })
    }

    /// Document location; the user id is percent-encoded as a single path segment.
    pub fn document_url(&self, user_id: &str, kind: CollectionKind) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        let file = format!("{}.json", kind);
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["users", user_id, file.as_str()]);
        Ok(url)
    }

    /// Request for one document, carrying the auth token as a query pair.
    fn request(
        &self,
        method: Method,
        user_id: &str,
        kind: CollectionKind,
    ) -> Result<RequestBuilder, StoreError> {
        let req = self.client.request(method, self.document_url(user_id, kind)?);
        Ok(match &self.auth_token {
            Some(token) => req.query(&[("auth", token)]),
            None => req,
        })
    }

    async fn fetch(&self, user_id: &str, kind: CollectionKind) -> Result<Value, StoreError> {
        let resp = self
            .request(Method::GET, user_id, kind)?
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<Value>().await?)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    /// Spawns a poll loop on the current tokio runtime; it ends once the returned
    /// channel is dropped.
    fn subscribe(&self, user_id: &str, kind: CollectionKind) -> Snapshots {
        let (tx, rx) = Snapshots::channel();
        let store = self.clone();
        let user = user_id.to_string();
        tokio::spawn(async move {
            let mut last: Option<Value> = None;
            loop {
                if tx.is_released() {
                    break;
                }
                match store.fetch(&user, kind).await {
                    Ok(v) => {
                        if last.as_ref() != Some(&v) {
                            if !tx.deliver(v.clone()) {
                                break;
                            }
                            last = Some(v);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(user = %user, %kind, error = %e, "poll failed");
                    }
                }
                tokio::time::sleep(store.poll_interval).await;
            }
            tracing::debug!(user = %user, %kind, "poll loop released");
        });
        rx
    }

    async fn write(
        &self,
        user_id: &str,
        kind: CollectionKind,
        value: Snapshot,
    ) -> Result<(), StoreError> {
        let resp = self
            .request(Method::PUT, user_id, kind)?
            .json(&value)
            .send()
            .await?;
        let status = resp.status();
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                user: user_id.to_string(),
                kind,
                reason: format!("{} {}", status, body.trim()),
            });
        }
        resp.error_for_status()?;
        Ok(())
    }
}
