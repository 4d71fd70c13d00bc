//! Soft-delete, restore, and purge cascades exercised through the
//! service with the dependency graph in play.

use crate::in_memory::helpers::{admin, create_task, stack, Stack};
use foreman::task::ports::TaskStore;
use foreman::task::services::TaskServiceError;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn destroying_a_task_sweeps_its_dependent_tree(stack: Stack) {
    let actor = admin();
    let root = create_task(&stack, &actor, "Provision cluster", []).await;
    let middle = create_task(&stack, &actor, "Deploy services", [root.id()]).await;
    let leaf = create_task(&stack, &actor, "Run smoke checks", [middle.id()]).await;
    let bystander = create_task(&stack, &actor, "Unrelated chore", []).await;

    let removed = stack
        .service
        .destroy(root.id(), &actor)
        .await
        .expect("destroy should succeed");

    assert_eq!(removed, vec![root.id(), middle.id(), leaf.id()]);
    let live = stack
        .store
        .find(bystander.id())
        .await
        .expect("store lookup succeeds");
    assert!(live.is_some(), "tasks outside the tree stay live");
    let trashed = stack
        .service
        .trashed(&actor)
        .await
        .expect("trashed listing should succeed");
    assert_eq!(trashed.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_revives_the_tree_with_its_children(stack: Stack) {
    let actor = admin();
    let root = create_task(&stack, &actor, "Design review", []).await;
    let dependent = create_task(&stack, &actor, "Apply feedback", [root.id()]).await;
    stack
        .service
        .add_comment(dependent.id(), "Waiting on the review notes", &actor)
        .await
        .expect("comment should be recorded");
    stack
        .service
        .destroy(root.id(), &actor)
        .await
        .expect("destroy should succeed");

    let restored = stack
        .service
        .restore(root.id(), &actor)
        .await
        .expect("restore should succeed");

    assert_eq!(restored, vec![root.id(), dependent.id()]);
    let detail = stack
        .service
        .show(dependent.id(), &actor)
        .await
        .expect("restored task should be visible");
    assert_eq!(detail.comments.len(), 1, "children come back with the task");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restoring_a_live_task_is_not_found(stack: Stack) {
    let actor = admin();
    let task = create_task(&stack, &actor, "Already live", []).await;

    let err = stack
        .service
        .restore(task.id(), &actor)
        .await
        .expect_err("restore should only accept trashed tasks");

    assert!(matches!(err, TaskServiceError::NotFound(id) if id == task.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn force_delete_leaves_no_trace(stack: Stack) {
    let actor = admin();
    let root = create_task(&stack, &actor, "Abandoned initiative", []).await;
    let dependent = create_task(&stack, &actor, "Abandoned follow-up", [root.id()]).await;
    stack
        .service
        .destroy(root.id(), &actor)
        .await
        .expect("destroy should succeed");

    let purged = stack
        .service
        .force_delete(root.id(), &actor)
        .await
        .expect("force delete should succeed");

    assert_eq!(purged, vec![root.id(), dependent.id()]);
    let err = stack
        .service
        .restore(root.id(), &actor)
        .await
        .expect_err("purged tasks cannot be restored");
    assert!(matches!(err, TaskServiceError::NotFound(_)));
    let trashed = stack
        .service
        .trashed(&actor)
        .await
        .expect("trashed listing should succeed");
    assert!(trashed.is_empty());
    let gone = stack
        .store
        .find_with_deleted(dependent.id())
        .await
        .expect("store lookup succeeds");
    assert!(gone.is_none(), "purge removes the rows outright");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_trashed_title_may_be_reused(stack: Stack) {
    let actor = admin();
    let original = create_task(&stack, &actor, "Release v1", []).await;
    stack
        .service
        .destroy(original.id(), &actor)
        .await
        .expect("destroy should succeed");

    let replacement = create_task(&stack, &actor, "Release v1", []).await;

    assert_ne!(replacement.id(), original.id());
    assert_eq!(replacement.title().as_str(), "Release v1");
}
