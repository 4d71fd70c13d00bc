//! Role and ownership enforcement across the service and engine.

use crate::in_memory::helpers::{
    admin, create_task, manager, plain_user, stack, today, tomorrow, Stack,
};
use foreman::task::domain::{TaskFilter, TaskKind, TaskPriority, TaskStatus};
use foreman::task::services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plain_users_cannot_create_tasks(stack: Stack) {
    let request = CreateTaskRequest::new(
        "Write minutes",
        TaskKind::Improvement,
        TaskPriority::Low,
        tomorrow(),
    );

    let err = stack
        .service
        .create(request, &plain_user())
        .await
        .expect_err("creation requires a management role");

    assert!(matches!(err, TaskServiceError::Unauthorized(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managers_manage_only_their_own_tasks(stack: Stack) {
    let owner = manager();
    let rival = manager();
    let task = create_task(&stack, &owner, "Quarterly plan", []).await;

    let err = stack
        .service
        .update(task.id(), UpdateTaskRequest::new("Quarterly plan"), &rival)
        .await
        .expect_err("a foreign manager may not edit");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));

    let err = stack
        .service
        .destroy(task.id(), &rival)
        .await
        .expect_err("a foreign manager may not delete");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));

    stack
        .service
        .update(task.id(), UpdateTaskRequest::new("Quarterly plan v2"), &owner)
        .await
        .expect("the creator may edit");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admins_bypass_ownership_checks(stack: Stack) {
    let owner = manager();
    let root = admin();
    let task = create_task(&stack, &owner, "Handover notes", []).await;

    stack
        .service
        .update(task.id(), UpdateTaskRequest::new("Handover notes v2"), &root)
        .await
        .expect("admins edit any task");
    stack
        .service
        .destroy(task.id(), &root)
        .await
        .expect("admins delete any task");
    stack
        .service
        .restore(task.id(), &root)
        .await
        .expect("admins restore any task");
}

/// Assignment gives a plain user visibility and nothing more.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignees_may_view_but_not_modify(stack: Stack) {
    let owner = manager();
    let assignee = plain_user();
    let task = create_task(&stack, &owner, "Triage queue", []).await;
    stack
        .service
        .assign(task.id(), assignee.id(), &owner)
        .await
        .expect("assignment should succeed");

    stack
        .service
        .show(task.id(), &assignee)
        .await
        .expect("the assignee may view the task");

    let err = stack
        .service
        .update(task.id(), UpdateTaskRequest::new("Triage queue"), &assignee)
        .await
        .expect_err("the assignee may not edit");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));

    let err = stack
        .service
        .add_comment(task.id(), "Can I take this over?", &assignee)
        .await
        .expect_err("plain users hold no comment permission");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managers_cannot_view_foreign_tasks(stack: Stack) {
    let owner = manager();
    let rival = manager();
    let task = create_task(&stack, &owner, "Budget draft", []).await;

    let err = stack
        .service
        .show(task.id(), &rival)
        .await
        .expect_err("visibility is scoped to creator and assignee");

    assert!(matches!(err, TaskServiceError::Unauthorized(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_every_task_requires_admin(stack: Stack) {
    let err = stack
        .service
        .list(TaskFilter::new(), &manager())
        .await
        .expect_err("the unscoped listing is admin-only");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));

    stack
        .service
        .list(TaskFilter::new(), &admin())
        .await
        .expect("admins may list everything");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managers_review_trashed_and_blocked_queues(stack: Stack) {
    let boss = manager();
    stack
        .service
        .trashed(&boss)
        .await
        .expect("managers may review the trash");
    stack
        .service
        .blocked(today(), &boss)
        .await
        .expect("managers may review blocked tasks");

    let outsider = plain_user();
    let err = stack
        .service
        .trashed(&outsider)
        .await
        .expect_err("plain users may not review the trash");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));
    let err = stack
        .service
        .blocked(today(), &outsider)
        .await
        .expect_err("plain users may not review blocked tasks");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transitions_are_scoped_to_the_creating_manager(stack: Stack) {
    let owner = manager();
    let rival = manager();
    let task = create_task(&stack, &owner, "Incident writeup", []).await;

    let err = stack
        .engine
        .transition(task.id(), TaskStatus::InProgress, &rival)
        .await
        .expect_err("a foreign manager may not transition");
    assert!(matches!(err, TaskServiceError::Unauthorized(_)));

    stack
        .engine
        .transition(task.id(), TaskStatus::InProgress, &owner)
        .await
        .expect("the creator may transition");
}
