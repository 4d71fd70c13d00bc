//! Listing, filtering, detail assembly, and listing-cache behaviour.

use std::collections::BTreeSet;

use crate::in_memory::helpers::{admin, create_task, manager, stack, today, tomorrow, Stack};
use foreman::task::domain::{
    DependsOnFilter, NewTaskData, TaskFilter, TaskKind, TaskPriority, TaskStatus, TaskTitle,
};
use foreman::task::ports::TaskStore;
use foreman::task::services::{CreateTaskRequest, TaskServiceError};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_narrow_the_listing(stack: Stack) {
    let actor = admin();
    let hotfix = stack
        .service
        .create(
            CreateTaskRequest::new("Hotfix crash", TaskKind::Bug, TaskPriority::High, tomorrow()),
            &actor,
        )
        .await
        .expect("create should succeed");
    create_task(&stack, &actor, "Dark mode", []).await;
    let followup = create_task(&stack, &actor, "Verify hotfix", [hotfix.id()]).await;

    let bugs = stack
        .service
        .list(TaskFilter::new().with_kind(TaskKind::Bug), &actor)
        .await
        .expect("filtered listing should succeed");
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs.first().expect("one bug").id(), hotfix.id());

    let high = stack
        .service
        .list(TaskFilter::new().with_priority(TaskPriority::High), &actor)
        .await
        .expect("filtered listing should succeed");
    assert_eq!(high.len(), 1);

    let dependents = stack
        .service
        .list(
            TaskFilter::new().with_depends_on(DependsOnFilter::OnTask(hotfix.id())),
            &actor,
        )
        .await
        .expect("filtered listing should succeed");
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents.first().expect("one dependent").id(), followup.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_titles_are_rejected_case_insensitively(stack: Stack) {
    let actor = admin();
    create_task(&stack, &actor, "Release v1", []).await;

    let err = stack
        .service
        .create(
            CreateTaskRequest::new("RELEASE V1", TaskKind::Feature, TaskPriority::Medium, tomorrow()),
            &actor,
        )
        .await
        .expect_err("live titles are unique ignoring case");

    assert!(matches!(err, TaskServiceError::DuplicateTitle(title) if title == "RELEASE V1"));
}

/// Writes bypassing the service are invisible until a service mutation
/// invalidates the cached listing.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_serve_from_cache_until_a_mutation_invalidates(stack: Stack) {
    let actor = admin();
    create_task(&stack, &actor, "First task", []).await;
    let first = stack
        .service
        .list(TaskFilter::new(), &actor)
        .await
        .expect("listing should succeed");
    assert_eq!(first.len(), 1);

    let smuggled = foreman::task::domain::Task::create(
        NewTaskData {
            title: TaskTitle::new("Smuggled entry").expect("valid title"),
            description: None,
            kind: TaskKind::Feature,
            priority: TaskPriority::Medium,
            due_date: tomorrow(),
            created_by: actor.id(),
            assigned_to: None,
        },
        &DefaultClock,
    )
    .expect("valid task");
    stack
        .store
        .insert(&smuggled, &BTreeSet::new())
        .await
        .expect("direct insert should succeed");

    let cached = stack
        .service
        .list(TaskFilter::new(), &actor)
        .await
        .expect("listing should succeed");
    assert_eq!(cached.len(), 1, "the cached page hides the direct write");

    create_task(&stack, &actor, "Second task", []).await;
    let refreshed = stack
        .service
        .list(TaskFilter::new(), &actor)
        .await
        .expect("listing should succeed");
    assert_eq!(refreshed.len(), 3, "mutations refresh the listing");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn show_assembles_relations_between_tasks(stack: Stack) {
    let actor = admin();
    let auth = create_task(&stack, &actor, "Auth service", []).await;
    let login = create_task(&stack, &actor, "Login page", [auth.id()]).await;

    let detail = stack
        .service
        .show(login.id(), &actor)
        .await
        .expect("detail should load");
    assert_eq!(detail.dependencies.len(), 1);
    assert_eq!(detail.dependencies.first().expect("one dependency").id, auth.id());

    let detail = stack
        .service
        .show(auth.id(), &actor)
        .await
        .expect("detail should load");
    assert_eq!(detail.dependents.len(), 1);
    assert_eq!(detail.dependents.first().expect("one dependent").id, login.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocked_listing_reports_only_overdue_blocked_tasks(stack: Stack) {
    let actor = admin();
    let dep = create_task(&stack, &actor, "Land prerequisite", []).await;
    let due_today = stack
        .service
        .create(
            CreateTaskRequest::new("Urgent integration", TaskKind::Feature, TaskPriority::High, today())
                .with_dependencies(BTreeSet::from([dep.id()])),
            &actor,
        )
        .await
        .expect("create should succeed");
    stack
        .engine
        .transition(dep.id(), TaskStatus::InProgress, &actor)
        .await
        .expect("starting the dependency blocks the dependent");

    let not_yet = stack
        .service
        .blocked(today(), &manager())
        .await
        .expect("blocked listing should succeed");
    assert!(not_yet.is_empty(), "due today is not yet overdue");

    let overdue = stack
        .service
        .blocked(tomorrow(), &manager())
        .await
        .expect("blocked listing should succeed");
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue.first().expect("one blocked task").id(), due_today.id());
}
