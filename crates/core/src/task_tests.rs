// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use yare::parameterized;

fn make_task(clock: &impl Clock) -> PublishTask {
    PublishTask::new(
        "task-1",
        TaskSpec::new(Platform::Douyin, "acct-1", "video.mp4", "first upload"),
        clock,
    )
}

fn task_in_status(status: TaskStatus, clock: &impl Clock) -> PublishTask {
    let mut task = make_task(clock);
    match status {
        TaskStatus::Pending => {}
        TaskStatus::Running => {
            assert!(task.try_set_status(TaskStatus::Running, clock));
        }
        TaskStatus::Success => {
            assert!(task.try_set_status(TaskStatus::Running, clock));
            assert!(task.try_set_status(TaskStatus::Success, clock));
        }
        TaskStatus::Failed => {
            assert!(task.try_set_status(TaskStatus::Running, clock));
            assert!(task.try_set_status(TaskStatus::Failed, clock));
        }
        TaskStatus::Cancelled => {
            task.cancel(clock);
        }
    }
    task
}

#[test]
fn new_task_is_pending_with_zero_retries() {
    let clock = FakeClock::new();
    let task = make_task(&clock);

    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.retry_count, 0);
    assert!(!task.deleted);
    assert!(!task.schedule.enabled);
}

#[parameterized(
    pending_to_running = { TaskStatus::Pending, TaskStatus::Running },
    pending_to_cancelled = { TaskStatus::Pending, TaskStatus::Cancelled },
    running_to_success = { TaskStatus::Running, TaskStatus::Success },
    running_to_failed = { TaskStatus::Running, TaskStatus::Failed },
    running_to_cancelled = { TaskStatus::Running, TaskStatus::Cancelled },
    failed_to_pending = { TaskStatus::Failed, TaskStatus::Pending },
)]
fn valid_transitions(from: TaskStatus, to: TaskStatus) {
    let clock = FakeClock::new();
    let mut task = task_in_status(from, &clock);

    assert!(task.try_set_status(to, &clock));
    assert_eq!(task.status, to);
}

#[parameterized(
    pending_to_success = { TaskStatus::Pending, TaskStatus::Success },
    pending_to_failed = { TaskStatus::Pending, TaskStatus::Failed },
    running_to_pending = { TaskStatus::Running, TaskStatus::Pending },
    success_to_pending = { TaskStatus::Success, TaskStatus::Pending },
    success_to_running = { TaskStatus::Success, TaskStatus::Running },
    success_to_cancelled = { TaskStatus::Success, TaskStatus::Cancelled },
    cancelled_to_pending = { TaskStatus::Cancelled, TaskStatus::Pending },
    cancelled_to_running = { TaskStatus::Cancelled, TaskStatus::Running },
    failed_to_running = { TaskStatus::Failed, TaskStatus::Running },
    failed_to_success = { TaskStatus::Failed, TaskStatus::Success },
)]
fn invalid_transitions_are_rejected(from: TaskStatus, to: TaskStatus) {
    let clock = FakeClock::new();
    let mut task = task_in_status(from, &clock);

    assert!(!task.try_set_status(to, &clock));
    assert_eq!(task.status, from);
}

#[test]
fn terminal_statuses() {
    assert!(TaskStatus::Success.is_terminal());
    assert!(TaskStatus::Cancelled.is_terminal());
    assert!(!TaskStatus::Pending.is_terminal());
    assert!(!TaskStatus::Running.is_terminal());
    assert!(!TaskStatus::Failed.is_terminal());
}

#[test]
fn soft_delete_cancels_a_pending_task_first() {
    let clock = FakeClock::new();
    let mut task = make_task(&clock);

    task.soft_delete(&clock);

    assert_eq!(task.status, TaskStatus::Cancelled);
    assert!(task.deleted);
}

#[test]
fn soft_delete_cancels_a_running_task_first() {
    let clock = FakeClock::new();
    let mut task = task_in_status(TaskStatus::Running, &clock);

    task.soft_delete(&clock);

    assert_eq!(task.status, TaskStatus::Cancelled);
    assert!(task.deleted);
}

#[test]
fn soft_delete_leaves_a_terminal_status_alone() {
    let clock = FakeClock::new();
    let mut task = task_in_status(TaskStatus::Success, &clock);

    task.soft_delete(&clock);

    assert_eq!(task.status, TaskStatus::Success);
    assert!(task.deleted);
}

#[test]
fn soft_delete_is_idempotent() {
    let clock = FakeClock::new();
    let mut task = make_task(&clock);

    task.soft_delete(&clock);
    task.soft_delete(&clock);

    assert_eq!(task.status, TaskStatus::Cancelled);
    assert!(task.deleted);
}

#[test]
fn patch_applies_only_supplied_fields() {
    let clock = FakeClock::new();
    let mut task = make_task(&clock);
    task.error = Some("previous error".to_string());

    task.apply_patch(
        TaskPatch {
            video_id: Some("v-123".to_string()),
            ..TaskPatch::default()
        },
        &clock,
    );

    assert_eq!(task.video_id.as_deref(), Some("v-123"));
    assert_eq!(task.error.as_deref(), Some("previous error"));
    assert_eq!(task.video_url, None);
}

#[test]
fn resolved_schedule_is_none_when_disabled() {
    let clock = FakeClock::new();
    let task = make_task(&clock);
    assert_eq!(task.resolved_schedule(), None);
}

#[test]
fn resolved_schedule_returns_the_target_time() {
    let clock = FakeClock::new();
    let at = clock.now() + chrono::Duration::hours(6);
    let task = PublishTask::new(
        "task-1",
        TaskSpec::new(Platform::Douyin, "acct-1", "video.mp4", "scheduled").with_schedule(at),
        &clock,
    );

    assert!(task.schedule.enabled);
    assert_eq!(task.resolved_schedule(), Some(at));
}

// Property-based tests
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::Running),
        Just(TaskStatus::Success),
        Just(TaskStatus::Failed),
        Just(TaskStatus::Cancelled),
    ]
}

proptest! {
    #[test]
    fn terminal_statuses_accept_no_transition(to in any_status()) {
        for terminal in [TaskStatus::Success, TaskStatus::Cancelled] {
            prop_assert!(!terminal.can_transition(to));
        }
    }

    #[test]
    fn soft_delete_never_leaves_a_live_task(from in any_status()) {
        let clock = FakeClock::new();
        let mut task = task_in_status(from, &clock);

        task.soft_delete(&clock);

        prop_assert!(task.deleted);
        prop_assert!(!task.status.is_live());
    }

    #[test]
    fn only_failed_reenters_pending(from in any_status()) {
        prop_assert_eq!(
            from.can_transition(TaskStatus::Pending),
            from == TaskStatus::Failed
        );
    }
}
