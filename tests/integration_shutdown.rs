#![allow(clippy::unwrap_used, clippy::panic, missing_debug_implementations, unreachable_pub)]
use reqwest::StatusCode;
use std::time::Duration;

mod common;

#[tokio::test]
async fn test_graceful_shutdown_drains_and_exits() {
    let app = common::TestApp::spawn().await;

    let resp = app.post("/message/receive", common::RECEIVE_PAYLOAD).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = app.shutdown_tx.send(true);

    let result = tokio::time::timeout(Duration::from_secs(5), app.server).await.expect("server did not stop in time");
    assert!(result.unwrap().is_ok());
    assert_eq!(app.dispatcher.in_flight(), 0);
}

#[tokio::test]
async fn test_listener_closed_after_shutdown() {
    let app = common::TestApp::spawn().await;
    let url = format!("{}/message/send", app.url);

    let _ = app.shutdown_tx.send(true);
    tokio::time::timeout(Duration::from_secs(5), app.server).await.unwrap().unwrap().unwrap();

    let res = app.client.post(url).body(common::RECEIVE_PAYLOAD).send().await;
    assert!(res.is_err(), "server should no longer accept connections");
}
