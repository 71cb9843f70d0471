// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;

use fintrack::config::Config;
use fintrack::db::{self, SqliteStore};
use fintrack::http::HttpStore;
use fintrack::identity::{Identity, LocalIdentity};
use fintrack::sink::TracingSink;
use fintrack::store::RemoteStore;
use fintrack::{cli, commands, utils, ContainerOptions, StateContainer};

#[tokio::main]
async fn main() -> Result<()> {
    utils::init_tracing();
    let matches = cli::build_cli().get_matches();

    let mut cfg = Config::from_env()?;
    if let Some(user) = matches.get_one::<String>("user") {
        cfg.user = user.clone();
    }
    if let Some(url) = matches.get_one::<String>("remote") {
        cfg.remote_url = Some(url.clone());
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match &cfg.db_path {
                Some(p) => p.clone(),
                None => db::db_path()?,
            };
            SqliteStore::open(&path)?;
            println!("Database initialized at {}", path.display());
            return Ok(());
        }
        Some(("categories", sub)) => return commands::categories::handle(sub),
        Some(_) => {}
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
    }

    let store: Arc<dyn RemoteStore> = match &cfg.remote_url {
        Some(url) => Arc::new(HttpStore::new(url, cfg.auth_token.clone(), cfg.poll_interval)?),
        None => match &cfg.db_path {
            Some(p) => Arc::new(SqliteStore::open(p)?),
            None => Arc::new(SqliteStore::open_or_init()?),
        },
    };
    let identity = Arc::new(LocalIdentity::signed_in(Identity::new(cfg.user.clone())));
    let fin = StateContainer::create(
        store,
        identity,
        Arc::new(TracingSink),
        ContainerOptions {
            loading_timeout: cfg.loading_timeout,
            ..ContainerOptions::default()
        },
    );
    fin.wait_until_loaded().await;

    let outcome = match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&fin, sub),
        Some(("budget", sub)) => commands::budgets::handle(&fin, sub),
        Some(("goal", sub)) => commands::goals::handle(&fin, sub),
        Some(("currency", sub)) => commands::currency::handle(&fin, sub),
        Some(("report", sub)) => commands::reports::handle(&fin, sub),
        Some(("export", sub)) => commands::exporter::handle(&fin, sub),
        _ => Ok(()),
    };

    fin.flush().await;
    fin.shutdown().await;
    outcome
}
