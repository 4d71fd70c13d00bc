//! In-memory task store for tests and single-process use.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        Attachment, AttachmentId, Comment, CommentId, DependencyGraph, DependsOnFilter,
        StatusChange, Task, TaskDetail, TaskFilter, TaskId, TaskRef, TaskStatus,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TransitionPlan},
};

/// Error indicating a duplicate task ID was detected.
///
/// Used by the in-memory adapter to report identifier collisions in a
/// backend-agnostic way via [`TaskStoreError::persistence`].
#[derive(Debug)]
struct DuplicateIdError {
    id: TaskId,
}

impl fmt::Display for DuplicateIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task with id {} already exists", self.id)
    }
}

impl std::error::Error for DuplicateIdError {}

/// Thread-safe in-memory task store.
///
/// Holds every table behind one [`RwLock`], so each trait method is a
/// single atomic unit the way a transactional backend would provide.
/// Not suitable for durable production use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: HashMap<TaskId, Task>,
    graph: DependencyGraph,
    comments: HashMap<CommentId, Comment>,
    attachments: HashMap<AttachmentId, Attachment>,
    history: Vec<StatusChange>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> TaskStoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(&self) -> TaskStoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

/// Returns the task only when it exists and is not trashed.
fn live_task(state: &StoreState, id: TaskId) -> Option<&Task> {
    state.tasks.get(&id).filter(|task| !task.is_deleted())
}

/// Returns whether another live task already uses the candidate's title.
///
/// The comparison is case-insensitive, mirroring a case-folding unique
/// index on the title column.
fn title_conflict(state: &StoreState, candidate: &Task) -> bool {
    let key = candidate.title().normalized();
    state.tasks.values().any(|task| {
        task.id() != candidate.id() && !task.is_deleted() && task.title().normalized() == key
    })
}

/// Validates a proposed dependency set against the current graph.
fn validate_dependencies(
    state: &StoreState,
    task_id: TaskId,
    dependencies: &BTreeSet<TaskId>,
) -> TaskStoreResult<()> {
    for &dependency in dependencies {
        if dependency == task_id {
            return Err(TaskStoreError::SelfDependency(task_id));
        }
        if live_task(state, dependency).is_none() {
            return Err(TaskStoreError::UnknownDependency(dependency));
        }
        if state.graph.would_close_cycle(task_id, dependency) {
            return Err(TaskStoreError::DependencyCycle {
                task_id,
                dependency_id: dependency,
            });
        }
    }
    Ok(())
}

/// Collects `root` plus every transitive dependent accepted by `keep`,
/// breadth-first with a visited set so shared dependents appear once.
fn dependent_closure(
    state: &StoreState,
    root: TaskId,
    keep: impl Fn(&Task) -> bool,
) -> Vec<TaskId> {
    let mut closure = vec![root];
    let mut visited: HashSet<TaskId> = HashSet::from([root]);
    let mut queue: VecDeque<TaskId> = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for dependent in state.graph.dependents_of(current) {
            if visited.contains(&dependent) {
                continue;
            }
            let Some(task) = state.tasks.get(&dependent) else {
                continue;
            };
            if !keep(task) {
                continue;
            }
            visited.insert(dependent);
            closure.push(dependent);
            queue.push_back(dependent);
        }
    }
    closure
}

/// Soft-deletes the live child records of a task.
fn trash_children(state: &mut StoreState, task_id: TaskId, at: DateTime<Utc>) {
    for comment in state.comments.values_mut() {
        if comment.owner().task_id() == task_id && !comment.is_deleted() {
            comment.mark_deleted(at);
        }
    }
    for attachment in state.attachments.values_mut() {
        if attachment.owner().task_id() == task_id && !attachment.is_deleted() {
            attachment.mark_deleted(at);
        }
    }
}

/// Restores the trashed child records of a task.
fn restore_children(state: &mut StoreState, task_id: TaskId, at: DateTime<Utc>) {
    for comment in state.comments.values_mut() {
        if comment.owner().task_id() == task_id && comment.is_deleted() {
            comment.clear_deleted(at);
        }
    }
    for attachment in state.attachments.values_mut() {
        if attachment.owner().task_id() == task_id && attachment.is_deleted() {
            attachment.clear_deleted(at);
        }
    }
}

/// Permanently removes the child records of a task.
fn purge_children(state: &mut StoreState, task_id: TaskId) {
    state
        .comments
        .retain(|_, comment| comment.owner().task_id() != task_id);
    state
        .attachments
        .retain(|_, attachment| attachment.owner().task_id() != task_id);
}

/// Collects the comments of a task, oldest first.
fn comments_sorted(state: &StoreState, task_id: TaskId, live_only: bool) -> Vec<Comment> {
    let mut comments: Vec<Comment> = state
        .comments
        .values()
        .filter(|comment| comment.owner().task_id() == task_id)
        .filter(|comment| !live_only || !comment.is_deleted())
        .cloned()
        .collect();
    comments.sort_by_key(|comment| (comment.created_at(), comment.id()));
    comments
}

/// Collects the attachments of a task, oldest first.
fn attachments_sorted(state: &StoreState, task_id: TaskId, live_only: bool) -> Vec<Attachment> {
    let mut attachments: Vec<Attachment> = state
        .attachments
        .values()
        .filter(|attachment| attachment.owner().task_id() == task_id)
        .filter(|attachment| !live_only || !attachment.is_deleted())
        .cloned()
        .collect();
    attachments.sort_by_key(|attachment| (attachment.created_at(), attachment.id()));
    attachments
}

/// Builds reference lists to related tasks accepted by `keep`.
fn related_refs(
    state: &StoreState,
    ids: impl Iterator<Item = TaskId>,
    keep: impl Fn(&Task) -> bool,
) -> Vec<TaskRef> {
    ids.filter_map(|id| state.tasks.get(&id))
        .filter(|task| keep(task))
        .map(TaskRef::of)
        .collect()
}

/// Assembles the detail projection of one task.
fn assemble_detail(state: &StoreState, task: &Task, live_only: bool) -> TaskDetail {
    let keep = |related: &Task| !live_only || !related.is_deleted();
    TaskDetail {
        task: task.clone(),
        dependencies: related_refs(state, state.graph.depends_on(task.id()), keep),
        dependents: related_refs(state, state.graph.dependents_of(task.id()), keep),
        comments: comments_sorted(state, task.id(), live_only),
        attachments: attachments_sorted(state, task.id(), live_only),
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: &Task, dependencies: &BTreeSet<TaskId>) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::persistence(DuplicateIdError {
                id: task.id(),
            }));
        }
        if title_conflict(&state, task) {
            return Err(TaskStoreError::DuplicateTitle(task.title().to_string()));
        }
        validate_dependencies(&state, task.id(), dependencies)?;

        for &dependency in dependencies {
            state.graph.insert_edge(task.id(), dependency);
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(
        &self,
        task: &Task,
        dependencies: Option<&BTreeSet<TaskId>>,
    ) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        if title_conflict(&state, task) {
            return Err(TaskStoreError::DuplicateTitle(task.title().to_string()));
        }
        if let Some(edges) = dependencies {
            validate_dependencies(&state, task.id(), edges)?;
            state.graph.replace_dependencies(task.id(), edges.clone());
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(live_task(&state, id).cloned())
    }

    async fn find_with_deleted(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn detail(&self, id: TaskId) -> TaskStoreResult<Option<TaskDetail>> {
        let state = self.read_state()?;
        Ok(live_task(&state, id).map(|task| assemble_detail(&state, task, true)))
    }

    async fn list(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| !task.is_deleted())
            .filter(|task| filter.matches_task(task))
            .filter(|task| match filter.depends_on() {
                None => true,
                Some(DependsOnFilter::WithoutDependencies) => {
                    state.graph.depends_on(task.id()).next().is_none()
                }
                Some(DependsOnFilter::OnTask(dependency)) => {
                    state.graph.depends_on(task.id()).any(|id| id == dependency)
                }
            })
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn list_blocked_before(&self, day: NaiveDate) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| !task.is_deleted())
            .filter(|task| task.status() == TaskStatus::Blocked)
            .filter(|task| task.due_date() < day)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn list_trashed(&self) -> TaskStoreResult<Vec<TaskDetail>> {
        let state = self.read_state()?;
        let mut trashed: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| task.is_deleted())
            .collect();
        trashed.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(trashed
            .into_iter()
            .map(|task| assemble_detail(&state, task, false))
            .collect())
    }

    async fn dependencies_of(&self, id: TaskId) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        if live_task(&state, id).is_none() {
            return Err(TaskStoreError::NotFound(id));
        }
        let tasks = state
            .graph
            .depends_on(id)
            .filter_map(|dependency| live_task(&state, dependency))
            .cloned()
            .collect();
        Ok(tasks)
    }

    async fn dependents_of(&self, id: TaskId) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        if live_task(&state, id).is_none() {
            return Err(TaskStoreError::NotFound(id));
        }
        let tasks = state
            .graph
            .dependents_of(id)
            .filter_map(|dependent| live_task(&state, dependent))
            .cloned()
            .collect();
        Ok(tasks)
    }

    async fn status_history(&self, id: TaskId) -> TaskStoreResult<Vec<StatusChange>> {
        let state = self.read_state()?;
        Ok(state
            .history
            .iter()
            .filter(|record| record.task_id() == id)
            .cloned()
            .collect())
    }

    async fn commit_transition(&self, plan: &TransitionPlan) -> TaskStoreResult<Vec<StatusChange>> {
        let mut state = self.write_state()?;

        // Validate the whole plan before touching anything.
        for write in &plan.writes {
            let task = live_task(&state, write.task_id)
                .ok_or(TaskStoreError::NotFound(write.task_id))?;
            if task.status() != write.expected {
                return Err(TaskStoreError::StatusConflict {
                    task_id: write.task_id,
                    expected: write.expected,
                    actual: task.status(),
                });
            }
        }

        let mut records = Vec::with_capacity(plan.writes.len());
        for write in &plan.writes {
            if let Some(task) = state.tasks.get_mut(&write.task_id) {
                task.apply_status(write.next, plan.changed_at);
            }
            let record = StatusChange::record(
                write.task_id,
                write.expected,
                write.next,
                plan.changed_by,
                plan.changed_at,
            );
            state.history.push(record.clone());
            records.push(record);
        }
        Ok(records)
    }

    async fn delete_tree(&self, root: TaskId, at: DateTime<Utc>) -> TaskStoreResult<Vec<TaskId>> {
        let mut state = self.write_state()?;
        if live_task(&state, root).is_none() {
            return Err(TaskStoreError::NotFound(root));
        }
        let closure = dependent_closure(&state, root, |task| !task.is_deleted());
        for &id in &closure {
            trash_children(&mut state, id, at);
            if let Some(task) = state.tasks.get_mut(&id) {
                task.mark_deleted(at);
            }
        }
        Ok(closure)
    }

    async fn restore_tree(&self, root: TaskId, at: DateTime<Utc>) -> TaskStoreResult<Vec<TaskId>> {
        let mut state = self.write_state()?;
        let trashed = state
            .tasks
            .get(&root)
            .is_some_and(|task| task.is_deleted());
        if !trashed {
            return Err(TaskStoreError::NotFound(root));
        }
        let closure = dependent_closure(&state, root, Task::is_deleted);
        for &id in &closure {
            restore_children(&mut state, id, at);
            if let Some(task) = state.tasks.get_mut(&id) {
                task.clear_deleted(at);
            }
        }
        Ok(closure)
    }

    async fn purge_tree(&self, root: TaskId) -> TaskStoreResult<Vec<TaskId>> {
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&root) {
            return Err(TaskStoreError::NotFound(root));
        }
        let closure = dependent_closure(&state, root, |_| true);
        let removed: HashSet<TaskId> = closure.iter().copied().collect();
        for &id in &closure {
            purge_children(&mut state, id);
            state.graph.clear_task(id);
            state.tasks.remove(&id);
        }
        state
            .history
            .retain(|record| !removed.contains(&record.task_id()));
        Ok(closure)
    }

    async fn comments_of(&self, id: TaskId) -> TaskStoreResult<Vec<Comment>> {
        let state = self.read_state()?;
        Ok(comments_sorted(&state, id, false))
    }

    async fn attachments_of(&self, id: TaskId) -> TaskStoreResult<Vec<Attachment>> {
        let state = self.read_state()?;
        Ok(attachments_sorted(&state, id, false))
    }

    async fn add_comment(&self, comment: &Comment) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let owner = comment.owner().task_id();
        if live_task(&state, owner).is_none() {
            return Err(TaskStoreError::NotFound(owner));
        }
        state.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn add_attachment(&self, attachment: &Attachment) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let owner = attachment.owner().task_id();
        if live_task(&state, owner).is_none() {
            return Err(TaskStoreError::NotFound(owner));
        }
        state.attachments.insert(attachment.id(), attachment.clone());
        Ok(())
    }

    async fn remove_comment(&self, id: CommentId, at: DateTime<Utc>) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or(TaskStoreError::CommentNotFound(id))?;
        comment.mark_deleted(at);
        Ok(())
    }

    async fn restore_comment(&self, id: CommentId, at: DateTime<Utc>) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or(TaskStoreError::CommentNotFound(id))?;
        comment.clear_deleted(at);
        Ok(())
    }

    async fn remove_attachment(&self, id: AttachmentId, at: DateTime<Utc>) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let attachment = state
            .attachments
            .get_mut(&id)
            .ok_or(TaskStoreError::AttachmentNotFound(id))?;
        attachment.mark_deleted(at);
        Ok(())
    }

    async fn restore_attachment(&self, id: AttachmentId, at: DateTime<Utc>) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        let attachment = state
            .attachments
            .get_mut(&id)
            .ok_or(TaskStoreError::AttachmentNotFound(id))?;
        attachment.clear_deleted(at);
        Ok(())
    }
}
