// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crosspost_core::{FakeClock, SequentialIdGen, VerifyMethod};
use std::time::Duration;

fn registry() -> (CredentialRegistry<FakeClock, SequentialIdGen>, FakeClock) {
    let clock = FakeClock::new();
    let registry = CredentialRegistry::new(
        JsonStore::open_temp().unwrap(),
        clock.clone(),
        SequentialIdGen::new("acct"),
    );
    (registry, clock)
}

fn spec(name: &str) -> AccountSpec {
    AccountSpec::new(Platform::Douyin, format!("{name}.json"), name)
}

const DAY: Duration = Duration::from_secs(24 * 3600);

#[test]
fn create_schedules_the_first_refresh_one_interval_out() {
    let (registry, clock) = registry();
    let account = registry
        .create(spec("blogger").with_refresh_interval_days(7))
        .unwrap();

    let expected = clock.now() + chrono::Duration::days(7);
    assert_eq!(account.next_refresh_at, Some(expected));
    assert_eq!(account.publish_count, 0);
    assert_eq!(account.verify_count, 0);
}

#[test]
fn create_without_auto_refresh_leaves_no_due_time() {
    let (registry, _) = registry();
    let account = registry
        .create(spec("blogger").with_auto_refresh(false))
        .unwrap();
    assert_eq!(account.next_refresh_at, None);
}

#[test]
fn create_rejects_blank_name_and_credential() {
    let (registry, _) = registry();

    assert!(matches!(
        registry.create(AccountSpec::new(Platform::Douyin, "c.json", "  ")),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        registry.create(AccountSpec::new(Platform::Douyin, "", "name")),
        Err(Error::Validation(_))
    ));
}

#[test]
fn record_verification_flips_status_and_counts() {
    let (registry, clock) = registry();
    let account = registry.create(spec("blogger")).unwrap();
    assert_eq!(account.status, AccountStatus::Invalid);

    let verified = registry.record_verification(&account.id, true).unwrap();
    assert_eq!(verified.status, AccountStatus::Valid);
    assert_eq!(verified.verify_count, 1);
    assert_eq!(verified.last_verified_at, Some(clock.now()));

    let failed = registry.record_verification(&account.id, false).unwrap();
    assert_eq!(failed.status, AccountStatus::Invalid);
    assert_eq!(failed.verify_count, 2);
}

#[test]
fn record_usage_tracks_success_and_failure() {
    let (registry, _) = registry();
    let account = registry.create(spec("blogger")).unwrap();

    registry.record_usage(&account.id, true).unwrap();
    registry.record_usage(&account.id, true).unwrap();
    let after = registry.record_usage(&account.id, false).unwrap();

    assert_eq!(after.publish_count, 3);
    assert_eq!(after.success_count, 2);
    assert_eq!(after.fail_count, 1);
    assert!(after.last_used_at.is_some());
}

#[test]
fn schedule_next_refresh_pushes_the_due_time_forward() {
    let (registry, clock) = registry();
    let account = registry
        .create(spec("blogger").with_refresh_interval_days(3))
        .unwrap();

    clock.advance(2 * DAY);
    let rescheduled = registry.schedule_next_refresh(&account.id).unwrap();
    let expected = clock.now() + chrono::Duration::days(3);
    assert_eq!(rescheduled.next_refresh_at, Some(expected));
}

#[test]
fn find_due_skips_disabled_and_unscheduled_accounts() {
    let (registry, clock) = registry();
    registry
        .create(spec("due").with_refresh_interval_days(1))
        .unwrap();
    registry
        .create(spec("disabled").with_auto_refresh(false))
        .unwrap();
    registry
        .create(spec("later").with_refresh_interval_days(30))
        .unwrap();

    clock.advance(2 * DAY);
    let due = registry.find_due_for_refresh().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].name, "due");
}

#[test]
fn find_due_orders_by_due_time_ascending() {
    let (registry, clock) = registry();
    registry
        .create(spec("second").with_refresh_interval_days(2))
        .unwrap();
    registry
        .create(spec("first").with_refresh_interval_days(1))
        .unwrap();

    clock.advance(3 * DAY);
    let due = registry.find_due_for_refresh().unwrap();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].name, "first");
    assert_eq!(due[1].name, "second");
}

#[test]
fn find_due_does_not_mutate_refresh_state() {
    let (registry, clock) = registry();
    let account = registry
        .create(spec("due").with_refresh_interval_days(1))
        .unwrap();

    clock.advance(2 * DAY);
    registry.find_due_for_refresh().unwrap();
    registry.find_due_for_refresh().unwrap();

    let unchanged = registry.get(&account.id).unwrap();
    assert_eq!(unchanged.next_refresh_at, account.next_refresh_at);
}

#[test]
fn update_recomputes_refresh_on_toggle() {
    let (registry, clock) = registry();
    let account = registry
        .create(spec("blogger").with_auto_refresh(false))
        .unwrap();
    assert_eq!(account.next_refresh_at, None);

    let enabled = registry
        .update(
            &account.id,
            AccountPatch {
                auto_refresh: Some(true),
                refresh_interval_days: Some(5),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        enabled.next_refresh_at,
        Some(clock.now() + chrono::Duration::days(5))
    );

    let disabled = registry
        .update(
            &account.id,
            AccountPatch {
                auto_refresh: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(disabled.next_refresh_at, None);
}

#[test]
fn update_leaves_unsupplied_fields_alone() {
    let (registry, _) = registry();
    let account = registry
        .create(spec("blogger").with_group("grp-1"))
        .unwrap();

    let renamed = registry
        .update(
            &account.id,
            AccountPatch {
                name: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "renamed");
    assert_eq!(renamed.group_id.as_deref(), Some("grp-1"));
    assert_eq!(renamed.credential, account.credential);
}

#[test]
fn delete_removes_the_account() {
    let (registry, _) = registry();
    let account = registry.create(spec("blogger")).unwrap();

    registry.delete(&account.id).unwrap();
    assert!(matches!(
        registry.get(&account.id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn statistics_aggregate_over_all_accounts() {
    let (registry, _) = registry();
    let a = registry.create(spec("a")).unwrap();
    let b = registry
        .create(AccountSpec::new(Platform::Kuaishou, "b.json", "b"))
        .unwrap();
    registry.record_verification(&a.id, true).unwrap();
    registry.record_usage(&a.id, true).unwrap();
    registry.record_usage(&b.id, false).unwrap();

    let stats = registry.statistics().unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.valid, 1);
    assert_eq!(stats.invalid, 1);
    assert_eq!(stats.by_platform[&Platform::Douyin], 1);
    assert_eq!(stats.by_platform[&Platform::Kuaishou], 1);
    assert_eq!(stats.total_publishes, 2);
    assert_eq!(stats.total_successes, 1);
}

#[test]
fn verification_log_round_trips() {
    let (registry, clock) = registry();
    let account = registry.create(spec("blogger")).unwrap();

    registry
        .append_verification(&VerificationLogEntry {
            id: "v-1".to_string(),
            account_id: account.id.clone(),
            platform: account.platform,
            ok: true,
            method: VerifyMethod::Background,
            error: None,
            duration_ms: 840,
            verified_at: clock.now(),
        })
        .unwrap();

    let log = registry.verification_log(&account.id, 10).unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].ok);
    assert_eq!(log[0].method, VerifyMethod::Background);
}

#[test]
fn listing_filters_by_platform_status_group_and_keyword() {
    let (registry, _) = registry();
    let blogger = registry.create(spec("blogger")).unwrap();
    let vlogger = registry
        .create(
            AccountSpec::new(Platform::Xiaohongshu, "vlogger.json", "Vlogger").with_group("team-a"),
        )
        .unwrap();
    registry.record_verification(&blogger.id, false).unwrap();

    let by_platform = AccountFilter {
        platform: Some(Platform::Xiaohongshu),
        ..AccountFilter::default()
    };
    assert_eq!(registry.list(&by_platform).unwrap()[0].id, vlogger.id);

    let by_status = AccountFilter {
        status: Some(AccountStatus::Invalid),
        ..AccountFilter::default()
    };
    assert_eq!(registry.list(&by_status).unwrap()[0].id, blogger.id);

    let by_group = AccountFilter {
        group_id: Some("team-a".to_string()),
        ..AccountFilter::default()
    };
    assert_eq!(registry.list(&by_group).unwrap().len(), 1);

    let by_keyword = AccountFilter {
        keyword: Some("vlog".to_string()),
        ..AccountFilter::default()
    };
    assert_eq!(registry.list(&by_keyword).unwrap()[0].id, vlogger.id);

    assert_eq!(registry.list(&AccountFilter::default()).unwrap().len(), 2);
}
