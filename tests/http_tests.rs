// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fintrack::errors::StoreError;
use fintrack::http::HttpStore;
use fintrack::store::{CollectionKind, RemoteStore};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const POLL: Duration = Duration::from_millis(20);

/// What the fake document server holds and how it answers.
struct Server {
    doc: String,
    put_status: u16,
    gets: usize,
    paths: Vec<String>,
}

type Shared = Arc<Mutex<Server>>;

async fn serve() -> (String, Shared) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shared: Shared = Arc::new(Mutex::new(Server {
        doc: "null".into(),
        put_status: 200,
        gets: 0,
        paths: Vec::new(),
    }));
    let state = shared.clone();
    tokio::spawn(async move {
        loop {
            let Ok((sock, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(answer(sock, state.clone()));
        }
    });
    (format!("http://{}", addr), shared)
}

async fn answer(mut sock: TcpStream, state: Shared) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = sock.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(i) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break i + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let length: usize = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0);
    while buf.len() < head_end + length {
        let n = sock.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

    let (status, reply) = {
        let mut s = state.lock().unwrap();
        s.paths.push(path);
        match method.as_str() {
            "GET" => {
                s.gets += 1;
                (200, s.doc.clone())
            }
            "PUT" if s.put_status == 200 => {
                s.doc = body;
                (200, "null".to_string())
            }
            "PUT" => (s.put_status, "{\"error\":\"Permission denied\"}".to_string()),
            _ => (405, String::new()),
        }
    };
    let response = format!(
        "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    let _ = sock.write_all(response.as_bytes()).await;
    let _ = sock.shutdown().await;
}

fn gets(state: &Shared) -> usize {
    state.lock().unwrap().gets
}

#[tokio::test]
async fn write_puts_document_with_token() {
    let (base, state) = serve().await;
    let store = HttpStore::new(&base, Some("tok".into()), POLL).unwrap();
    store
        .write("u1", CollectionKind::Budgets, json!([{"id": "b1"}]))
        .await
        .unwrap();
    let s = state.lock().unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&s.doc).unwrap(),
        json!([{"id": "b1"}])
    );
    assert_eq!(s.paths, ["/users/u1/budgets.json?auth=tok"]);
}

#[tokio::test]
async fn client_error_on_write_is_rejected() {
    let (base, state) = serve().await;
    state.lock().unwrap().put_status = 403;
    let store = HttpStore::new(&base, None, POLL).unwrap();
    let err = store
        .write("u1", CollectionKind::Goals, json!([]))
        .await
        .unwrap_err();
    match err {
        StoreError::Rejected { user, kind, reason } => {
            assert_eq!(user, "u1");
            assert_eq!(kind, CollectionKind::Goals);
            assert!(reason.contains("403"), "{}", reason);
            assert!(reason.contains("Permission denied"), "{}", reason);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(state.lock().unwrap().doc, "null");
}

#[tokio::test]
async fn subscription_delivers_only_when_document_changes() {
    let (base, state) = serve().await;
    let store = HttpStore::new(&base, None, POLL).unwrap();
    let mut sub = store.subscribe("u1", CollectionKind::Transactions);

    let first = tokio::time::timeout(Duration::from_secs(5), sub.next())
        .await
        .unwrap();
    assert_eq!(first, Some(Value::Null));

    // Several polls of an unchanged document deliver nothing.
    let quiet = tokio::time::timeout(POLL * 5, sub.next()).await;
    assert!(quiet.is_err());
    assert!(gets(&state) >= 2);

    state.lock().unwrap().doc = r#"[{"id":"t1"}]"#.into();
    let changed = tokio::time::timeout(Duration::from_secs(5), sub.next())
        .await
        .unwrap();
    assert_eq!(changed, Some(json!([{"id": "t1"}])));
}

#[tokio::test]
async fn poll_loop_stops_once_released() {
    let (base, state) = serve().await;
    let store = HttpStore::new(&base, None, POLL).unwrap();
    let mut sub = store.subscribe("u1", CollectionKind::Settings);
    tokio::time::timeout(Duration::from_secs(5), sub.next())
        .await
        .unwrap();
    drop(sub);

    // One poll may already be in flight when the receiver goes away.
    tokio::time::sleep(POLL * 5).await;
    let settled = gets(&state);
    tokio::time::sleep(POLL * 5).await;
    assert_eq!(gets(&state), settled);
}
