// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[tokio::test]
async fn confirm_fires_the_waiting_receiver() {
    let registry = ManualSessionRegistry::new();
    let rx = registry.register("sess-1", now());

    assert!(registry.confirm("sess-1"));
    rx.await.unwrap();
    assert!(registry.is_empty());
}

#[test]
fn confirming_an_unknown_session_is_a_failed_no_op() {
    let registry = ManualSessionRegistry::new();
    assert!(!registry.confirm("ghost"));
    assert!(registry.is_empty());
}

#[test]
fn a_session_confirms_at_most_once() {
    let registry = ManualSessionRegistry::new();
    let _rx = registry.register("sess-1", now());

    assert!(registry.confirm("sess-1"));
    assert!(!registry.confirm("sess-1"));
}

#[test]
fn confirm_after_the_waiter_gave_up_reports_failure() {
    let registry = ManualSessionRegistry::new();
    let rx = registry.register("sess-1", now());
    drop(rx);

    assert!(!registry.confirm("sess-1"));
}

#[tokio::test]
async fn reregistering_supersedes_the_previous_waiter() {
    let registry = ManualSessionRegistry::new();
    let old = registry.register("sess-1", now());
    let new = registry.register("sess-1", now());

    // The replaced sender was dropped, so the old waiter errors out
    assert!(old.await.is_err());

    assert!(registry.confirm("sess-1"));
    new.await.unwrap();
}

#[test]
fn remove_drops_without_firing() {
    let registry = ManualSessionRegistry::new();
    let _rx = registry.register("sess-1", now());

    assert_eq!(registry.len(), 1);
    assert!(registry.remove("sess-1"));
    assert!(!registry.remove("sess-1"));
    assert!(!registry.confirm("sess-1"));
}

#[test]
fn created_at_is_visible_while_registered() {
    let registry = ManualSessionRegistry::new();
    let t = now();
    let _rx = registry.register("sess-1", t);

    assert_eq!(registry.created_at("sess-1"), Some(t));
    assert_eq!(registry.created_at("ghost"), None);
}
