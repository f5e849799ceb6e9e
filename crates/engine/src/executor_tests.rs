// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crosspost_adapters::{FakeOutcome, FakePublisher};
use crosspost_core::{
    Account, AccountSpec, FakeClock, Platform, SequentialIdGen, TaskSpec,
};

struct Setup {
    _dir: tempfile::TempDir,
    store: JsonStore,
    registry: CredentialRegistry<FakeClock, SequentialIdGen>,
    publisher: FakePublisher,
    executor: TaskExecutor<FakePublisher, FakeClock, SequentialIdGen>,
    clock: FakeClock,
}

fn setup() -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let media_dir = dir.path().join("media");
    let cookies_dir = dir.path().join("cookies");
    std::fs::create_dir_all(&media_dir).unwrap();
    std::fs::create_dir_all(&cookies_dir).unwrap();
    std::fs::write(media_dir.join("video.mp4"), b"mp4").unwrap();
    std::fs::write(cookies_dir.join("cred.json"), b"{}").unwrap();

    let store = JsonStore::open_temp().unwrap();
    let clock = FakeClock::new();
    let ids = SequentialIdGen::new("id");
    let registry = CredentialRegistry::new(store.clone(), clock.clone(), ids.clone());
    let publisher = FakePublisher::new();
    let executor = TaskExecutor::new(
        store.clone(),
        registry.clone(),
        publisher.clone(),
        clock.clone(),
        ids,
        ExecutorConfig {
            media_dir,
            cookies_dir,
            ..Default::default()
        },
    );

    Setup {
        _dir: dir,
        store,
        registry,
        publisher,
        executor,
        clock,
    }
}

fn account(setup: &Setup) -> Account {
    setup
        .registry
        .create(AccountSpec::new(Platform::Douyin, "cred.json", "blogger"))
        .unwrap()
}

fn pending_task(setup: &Setup, account: &Account) -> PublishTask {
    let spec = TaskSpec::new(
        Platform::Douyin,
        account.id.0.as_str(),
        "video.mp4",
        "a title",
    );
    let task = PublishTask::new("task-1", spec, &setup.clock);
    setup.store.put_task(&task).unwrap();
    task
}

#[tokio::test]
async fn refuses_a_non_pending_task_without_side_effects() {
    let setup = setup();
    let acct = account(&setup);
    let mut task = pending_task(&setup, &acct);
    task.try_set_status(TaskStatus::Running, &setup.clock);
    setup.store.put_task(&task).unwrap();

    let err = setup.executor.execute(&task.id).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(setup.publisher.call_count(), 0);
    assert!(setup.store.history().unwrap().is_empty());
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let setup = setup();
    let err = setup
        .executor
        .execute(&TaskId("ghost".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn success_records_receipt_usage_and_one_history_row() {
    let setup = setup();
    let acct = account(&setup);
    let task = pending_task(&setup, &acct);

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Success);
    assert_eq!(done.video_id.as_deref(), Some("fake-video"));
    assert!(done.published_at.is_some());
    assert_eq!(done.retry_count, 0);

    let after = setup.registry.get(&acct.id).unwrap();
    assert_eq!(after.publish_count, 1);
    assert_eq!(after.success_count, 1);

    let history = setup.store.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TaskStatus::Success);
    assert_eq!(history[0].task_id, Some(task.id.clone()));
}

#[tokio::test(start_paused = true)]
async fn retries_publisher_failures_then_succeeds() {
    let setup = setup();
    let acct = account(&setup);
    let task = pending_task(&setup, &acct);
    setup.publisher.fail_times(2);

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Success);
    assert_eq!(done.retry_count, 2);
    assert_eq!(setup.publisher.call_count(), 3);

    // One row for the whole call, not one per attempt
    let history = setup.store.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TaskStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_end_in_failed_after_four_calls() {
    let setup = setup();
    let acct = account(&setup);
    let task = pending_task(&setup, &acct);
    setup.publisher.fail_times(10);

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Failed);
    assert_eq!(done.retry_count, 3);
    assert_eq!(setup.publisher.call_count(), 4);
    assert!(done.error.as_deref().unwrap_or("").contains("retries"));

    let after = setup.registry.get(&acct.id).unwrap();
    assert_eq!(after.fail_count, 1);
    assert_eq!(after.publish_count, 1);

    let history = setup.store.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TaskStatus::Failed);
}

#[tokio::test]
async fn helper_breakage_is_not_retried() {
    let setup = setup();
    let acct = account(&setup);
    let task = pending_task(&setup, &acct);
    setup
        .publisher
        .push(FakeOutcome::Break("chromium crashed".to_string()));

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Failed);
    assert_eq!(setup.publisher.call_count(), 1);
}

#[tokio::test]
async fn missing_account_fails_fast() {
    let setup = setup();
    let spec = TaskSpec::new(Platform::Douyin, "ghost", "video.mp4", "title");
    let task = PublishTask::new("task-1", spec, &setup.clock);
    setup.store.put_task(&task).unwrap();

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Failed);
    assert_eq!(setup.publisher.call_count(), 0);
    assert_eq!(setup.store.history().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_media_file_fails_fast() {
    let setup = setup();
    let acct = account(&setup);
    let spec = TaskSpec::new(
        Platform::Douyin,
        acct.id.0.as_str(),
        "nowhere.mp4",
        "title",
    );
    let task = PublishTask::new("task-1", spec, &setup.clock);
    setup.store.put_task(&task).unwrap();

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Failed);
    assert!(done.error.as_deref().unwrap_or("").contains("media"));
    assert_eq!(setup.publisher.call_count(), 0);
}

#[tokio::test]
async fn missing_credential_file_fails_fast() {
    let setup = setup();
    let acct = setup
        .registry
        .create(AccountSpec::new(Platform::Douyin, "gone.json", "blogger"))
        .unwrap();
    let spec = TaskSpec::new(Platform::Douyin, acct.id.0.as_str(), "video.mp4", "title");
    let task = PublishTask::new("task-1", spec, &setup.clock);
    setup.store.put_task(&task).unwrap();

    let done = setup.executor.execute(&task.id).await.unwrap();

    assert_eq!(done.status, TaskStatus::Failed);
    assert!(done.error.as_deref().unwrap_or("").contains("credential"));
    assert_eq!(setup.publisher.call_count(), 0);
}

#[tokio::test]
async fn publisher_sees_the_resolved_paths_and_schedule() {
    let setup = setup();
    let acct = account(&setup);
    let at = setup.clock.now() + chrono::Duration::hours(1);
    let spec = TaskSpec::new(Platform::Douyin, acct.id.0.as_str(), "video.mp4", "title")
        .with_schedule(at)
        .with_tags(vec!["cooking".to_string()]);
    let task = PublishTask::new("task-1", spec, &setup.clock);
    setup.store.put_task(&task).unwrap();

    setup.executor.execute(&task.id).await.unwrap();

    let calls = setup.publisher.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].media_path.ends_with("video.mp4"));
    assert!(calls[0].media_path.is_absolute());
    assert!(calls[0].credential_path.ends_with("cred.json"));
    assert_eq!(calls[0].schedule, Some(at));
    assert_eq!(calls[0].tags, vec!["cooking".to_string()]);
}
