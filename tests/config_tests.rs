// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use fintrack::config::Config;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let cfg = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.user, "local");
    assert_eq!(cfg.loading_timeout, Duration::from_secs(5));
}

#[test]
fn reads_every_key() {
    let cfg = Config::from_lookup(lookup(&[
        ("FINTRACK_DB", "/tmp/fin.sqlite"),
        ("FINTRACK_REMOTE_URL", "https://example.test/db"),
        ("FINTRACK_TOKEN", "secret"),
        ("FINTRACK_USER", "ada"),
        ("FINTRACK_LOADING_TIMEOUT_SECS", "12"),
        ("FINTRACK_POLL_SECS", "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.db_path, Some(PathBuf::from("/tmp/fin.sqlite")));
    assert_eq!(cfg.remote_url.as_deref(), Some("https://example.test/db"));
    assert_eq!(cfg.auth_token.as_deref(), Some("secret"));
    assert_eq!(cfg.user, "ada");
    assert_eq!(cfg.loading_timeout, Duration::from_secs(12));
    // Polling never drops below one second.
    assert_eq!(cfg.poll_interval, Duration::from_secs(1));
}

#[test]
fn blank_values_are_ignored() {
    let cfg = Config::from_lookup(lookup(&[("FINTRACK_USER", "  "), ("FINTRACK_TOKEN", "")]))
        .unwrap();
    assert_eq!(cfg.user, "local");
    assert!(cfg.auth_token.is_none());
}

#[test]
fn bad_numbers_are_errors() {
    let err = Config::from_lookup(lookup(&[("FINTRACK_POLL_SECS", "soon")])).unwrap_err();
    assert!(err.to_string().contains("FINTRACK_POLL_SECS"));
}
