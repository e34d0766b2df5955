// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use bh_core::PendingOperation;
use serde_json::json;

use super::*;
use crate::commands::testing::{output, TestContext};

async fn queued(t: &TestContext, ids: &[&str]) {
    for id in ids {
        t.ctx
            .engine
            .save("drivers", id, json!({ "name": id }))
            .await
            .unwrap();
    }
}

/// Dead-letter everything pending by failing three online replays.
async fn exhaust(t: &TestContext) {
    t.reconnect();
    t.ctx.monitor.check_connectivity(true).await;
    t.remote.reject_writes(true);
    for _ in 0..3 {
        t.ctx.engine.sync_pending().await.unwrap();
    }
    t.remote.reject_writes(false);
}

#[tokio::test(start_paused = true)]
async fn test_list_empty() {
    let t = TestContext::offline();
    let mut buf = Vec::new();

    list(&t.ctx, false, false, &mut buf).await.unwrap();

    assert_eq!(output(buf), "queue is empty\n");
}

#[tokio::test(start_paused = true)]
async fn test_list_shows_operations_in_order() {
    let t = TestContext::offline();
    queued(&t, &["d1", "d2"]).await;
    let mut buf = Vec::new();

    list(&t.ctx, false, false, &mut buf).await.unwrap();

    let text = output(buf);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("update drivers/d1 attempts=0"));
    assert!(lines[1].contains("update drivers/d2 attempts=0"));
}

#[tokio::test(start_paused = true)]
async fn test_list_json() {
    let t = TestContext::offline();
    queued(&t, &["d1"]).await;
    let mut buf = Vec::new();

    list(&t.ctx, true, false, &mut buf).await.unwrap();

    let ops: Vec<PendingOperation> = serde_json::from_str(&output(buf)).unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].document_id, "d1");
    assert_eq!(ops[0].payload, Some(json!({"name": "d1"})));
}

#[tokio::test(start_paused = true)]
async fn test_dead_letters_listing_and_requeue() {
    let t = TestContext::offline();
    queued(&t, &["d1"]).await;
    exhaust(&t).await;
    let mut buf = Vec::new();

    dead(&t.ctx, false, false, &mut buf).await.unwrap();
    requeue_dead(&t.ctx, &mut buf).await.unwrap();
    dead(&t.ctx, false, false, &mut buf).await.unwrap();

    let text = output(buf);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("update drivers/d1 attempts=3"));
    assert_eq!(lines[1], "requeued 1 operation(s)");
    assert_eq!(lines[2], "no dead letters");
    assert_eq!(t.ctx.engine.queue().len().await.unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_dead() {
    let t = TestContext::offline();
    queued(&t, &["d1", "d2"]).await;
    exhaust(&t).await;
    let mut buf = Vec::new();

    clear_dead(&t.ctx, &mut buf).await.unwrap();
    clear_dead(&t.ctx, &mut buf).await.unwrap();

    assert_eq!(
        output(buf),
        "cleared 2 dead letter(s)\ncleared 0 dead letter(s)\n"
    );
    assert!(t.ctx.engine.queue().is_empty().await.unwrap());
}
