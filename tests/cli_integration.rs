//! Binary-level tests for the one-shot subcommands. An in-process stub
//! backend runs on a dedicated thread; the binary under test talks to it
//! over localhost.

use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::net::TcpListener as StdTcpListener;

/// Pick a free port by binding to :0 and extracting the assigned port.
fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Serve `router` on `port` from a background thread for the lifetime of
/// the test process.
fn spawn_server(router: Router, port: u16) {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                .await
                .unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    // Give the listener a moment to come up.
    std::thread::sleep(std::time::Duration::from_millis(100));
}

fn chat_cmd(port: u16) -> Command {
    let mut cmd = Command::cargo_bin("chat").unwrap();
    cmd.arg("--server").arg(format!("http://127.0.0.1:{}", port));
    cmd
}

#[test]
fn ask_prints_one_answer_card() {
    let port = free_port();
    let router = Router::new().route(
        "/ask",
        post(|Json(body): Json<Value>| async move {
            let question = body["question"].as_str().unwrap_or_default();
            assert_eq!(question, "What is X?");
            Json(json!({"answer": {"result": "X is Y"}}))
        }),
    );
    spawn_server(router, port);

    chat_cmd(port)
        .args(["ask", "What is X?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("X is Y"));
}

#[test]
fn ask_with_empty_question_fails_without_a_request() {
    // Nothing listens on this port; an attempted request would also fail,
    // but with a different message than the empty-input error.
    let port = free_port();

    chat_cmd(port)
        .args(["ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question is empty"));
}

#[test]
fn ask_maps_500_to_the_generic_error() {
    let port = free_port();
    let router = Router::new().route(
        "/ask",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    spawn_server(router, port);

    chat_cmd(port)
        .args(["ask", "What is X?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch an answer"));
}

#[test]
fn ask_maps_connection_failure_to_the_generic_error() {
    let port = free_port();

    chat_cmd(port)
        .args(["ask", "What is X?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch an answer"));
}

#[test]
fn history_prints_stored_turns() {
    let port = free_port();
    let router = Router::new().route(
        "/api/history",
        get(|| async {
            Json(json!({"history": [
                {"user": "hi", "timestamp": "t1"},
                {"assistant": "hello", "timestamp": "t2"}
            ]}))
        }),
    );
    spawn_server(router, port);

    chat_cmd(port)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("hi").and(predicate::str::contains("hello")));
}

#[test]
fn clear_reports_success() {
    let port = free_port();
    let router = Router::new().route(
        "/api/clear",
        post(|| async { Json(json!({"status": "ok"})) }),
    );
    spawn_server(router, port);

    chat_cmd(port)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared"));
}
