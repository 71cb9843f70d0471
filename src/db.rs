// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use async_trait::async_trait;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::StoreError;
use crate::store::{lock, CollectionKind, RemoteStore, Snapshot, Snapshots, Subscribers};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS documents(
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        body TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(user_id, kind)
    );
    "#,
    )?;
    Ok(())
}

/// Document store on a local SQLite file.
///
/// Change notification is in-process only: subscribers see writes made through this
/// handle, not writes from other processes sharing the file. Writes run on tokio's
/// blocking pool; the read behind `subscribe` is synchronous.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    subscribers: Subscribers,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_or_init() -> Result<Self> {
        Self::open(&db_path()?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            subscribers: Subscribers::default(),
        })
    }

    pub fn read(&self, user_id: &str, kind: CollectionKind) -> Result<Option<Value>, StoreError> {
        let conn = lock(&self.conn);
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE user_id=?1 AND kind=?2",
                params![user_id, kind.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        match body {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    /// Users with at least one stored document.
    pub fn users(&self) -> Result<Vec<String>, StoreError> {
        let conn = lock(&self.conn);
        let mut stmt = conn.prepare("SELECT DISTINCT user_id FROM documents ORDER BY user_id")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[async_trait]
impl RemoteStore for SqliteStore {
    fn subscribe(&self, user_id: &str, kind: CollectionKind) -> Snapshots {
        let current = match self.read(user_id, kind) {
            Ok(v) => v.unwrap_or(Value::Null),
            Err(e) => {
                tracing::warn!(user = user_id, %kind, error = %e, "unreadable document, delivering empty");
                Value::Null
            }
        };
        self.subscribers.add(user_id, kind, Some(current))
    }

    async fn write(
        &self,
        user_id: &str,
        kind: CollectionKind,
        value: Snapshot,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_string(&value)?;
        let conn = self.conn.clone();
        let user = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            lock(&conn).execute(
                "INSERT INTO documents(user_id, kind, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, kind) DO UPDATE SET body=excluded.body, updated_at=datetime('now')",
                params![user, kind.as_str(), body],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("sqlite write task failed: {}", e)))??;
        self.subscribers.publish(user_id, kind, &value);
        Ok(())
    }
}
