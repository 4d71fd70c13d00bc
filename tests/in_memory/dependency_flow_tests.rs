//! End-to-end dependency flows: lifecycle guards, the blocking cascade,
//! audit trails, and report dispatch, all through the wired stack.

use crate::in_memory::helpers::{admin, create_task, stack, Stack};
use foreman::task::domain::{TaskId, TaskStatus};
use foreman::task::ports::TaskStore;
use rstest::rstest;

async fn status_of(stack: &Stack, id: TaskId) -> TaskStatus {
    stack
        .store
        .find(id)
        .await
        .expect("store lookup succeeds")
        .expect("task exists")
        .status()
}

/// Walks the canonical two-task flow: the dependent cannot start until
/// its dependency has been worked to completion.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dependent_cannot_start_until_its_dependency_completes(
    stack: Stack,
) -> Result<(), eyre::Report> {
    let actor = admin();
    let schema = create_task(&stack, &actor, "Design schema", []).await;
    let api = create_task(&stack, &actor, "Build API", [schema.id()]).await;

    let err = stack
        .engine
        .transition(api.id(), TaskStatus::InProgress, &actor)
        .await
        .expect_err("dependency guard should fire");
    eyre::ensure!(
        err.to_string() == "Cannot change task status due to incomplete dependencies",
        "unexpected rejection: {err}"
    );

    let err = stack
        .engine
        .transition(schema.id(), TaskStatus::Completed, &actor)
        .await
        .expect_err("completion guard should fire");
    eyre::ensure!(
        err.to_string() == "Cannot change status to Completed unless current status is In Progress",
        "unexpected rejection: {err}"
    );

    stack
        .engine
        .transition(schema.id(), TaskStatus::InProgress, &actor)
        .await?;
    eyre::ensure!(
        status_of(&stack, api.id()).await == TaskStatus::Blocked,
        "starting the dependency should block the dependent"
    );

    stack
        .engine
        .transition(schema.id(), TaskStatus::Completed, &actor)
        .await?;
    eyre::ensure!(
        status_of(&stack, api.id()).await == TaskStatus::Open,
        "completing the dependency should release the dependent"
    );

    stack
        .engine
        .transition(api.id(), TaskStatus::InProgress, &actor)
        .await?;
    eyre::ensure!(
        status_of(&stack, api.id()).await == TaskStatus::InProgress,
        "the dependent should now be startable"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn starting_a_dependency_blocks_its_open_dependents(stack: Stack) {
    let actor = admin();
    let core = create_task(&stack, &actor, "Core engine", []).await;
    let panel = create_task(&stack, &actor, "Control panel", [core.id()]).await;

    let records = stack
        .engine
        .transition(core.id(), TaskStatus::InProgress, &actor)
        .await
        .expect("transition should succeed");

    assert_eq!(records.len(), 2, "one row for the task, one for the cascade");
    let cascade = records.get(1).expect("cascade audit row");
    assert_eq!(cascade.task_id(), panel.id());
    assert_eq!(cascade.from(), TaskStatus::Open);
    assert_eq!(cascade.to(), TaskStatus::Blocked);
    assert_eq!(cascade.changed_by(), actor.id());
    assert_eq!(status_of(&stack, panel.id()).await, TaskStatus::Blocked);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_the_dependency_leaves_a_block_release_audit_trail(stack: Stack) {
    let actor = admin();
    let core = create_task(&stack, &actor, "Core engine", []).await;
    let panel = create_task(&stack, &actor, "Control panel", [core.id()]).await;

    stack
        .engine
        .transition(core.id(), TaskStatus::InProgress, &actor)
        .await
        .expect("start should succeed");
    stack
        .engine
        .transition(core.id(), TaskStatus::Completed, &actor)
        .await
        .expect("completion should succeed");

    assert_eq!(status_of(&stack, panel.id()).await, TaskStatus::Open);
    let history = stack
        .store
        .status_history(panel.id())
        .await
        .expect("history lookup succeeds");
    let [blocked, released] = history.as_slice() else {
        panic!("expected two audit rows, found {}", history.len());
    };
    assert_eq!(blocked.from(), TaskStatus::Open);
    assert_eq!(blocked.to(), TaskStatus::Blocked);
    assert_eq!(released.from(), TaskStatus::Blocked);
    assert_eq!(released.to(), TaskStatus::Open);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_stay_completed(stack: Stack) {
    let actor = admin();
    let task = create_task(&stack, &actor, "Ship release notes", []).await;

    stack
        .engine
        .transition(task.id(), TaskStatus::InProgress, &actor)
        .await
        .expect("start should succeed");
    stack
        .engine
        .transition(task.id(), TaskStatus::Completed, &actor)
        .await
        .expect("completion should succeed");

    let err = stack
        .engine
        .transition(task.id(), TaskStatus::InProgress, &actor)
        .await
        .expect_err("reopening should be rejected");
    assert_eq!(
        err.to_string(),
        "Cannot change status to In Progress after it has been marked as Completed"
    );
    assert_eq!(status_of(&stack, task.id()).await, TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_transition_dispatches_one_report_job(stack: Stack) {
    let actor = admin();
    let task = create_task(&stack, &actor, "Prepare demo", []).await;

    stack
        .engine
        .transition(task.id(), TaskStatus::InProgress, &actor)
        .await
        .expect("start should succeed");
    stack
        .engine
        .transition(task.id(), TaskStatus::Completed, &actor)
        .await
        .expect("completion should succeed");

    let jobs = stack.reports.jobs();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|job| job.requested_by == actor.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_transitions_dispatch_nothing(stack: Stack) {
    let actor = admin();
    let task = create_task(&stack, &actor, "Prepare demo", []).await;

    stack
        .engine
        .transition(task.id(), TaskStatus::Completed, &actor)
        .await
        .expect_err("completion guard should fire");

    assert!(stack.reports.jobs().is_empty());
}
