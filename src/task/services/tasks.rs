//! Task CRUD, assignment, and child-record service.

use super::error::{TaskServiceError, TaskServiceResult, cache_failure, store_failure};
use crate::access::domain::{Actor, UserId};
use crate::access::services::{TaskAction, TaskPolicy};
use crate::task::domain::{
    Attachment, Comment, NewTaskData, OwnerRef, Task, TaskDescription, TaskDetail, TaskEdit,
    TaskFilter, TaskId, TaskKind, TaskPriority, TaskTitle,
};
use crate::task::ports::{CacheKey, ListingCache, TaskStore};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    kind: TaskKind,
    priority: TaskPriority,
    due_date: NaiveDate,
    assigned_to: Option<UserId>,
    dependencies: BTreeSet<TaskId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    pub fn new(
        title: impl Into<String>,
        kind: TaskKind,
        priority: TaskPriority,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind,
            priority,
            due_date,
            assigned_to: None,
            dependencies: BTreeSet::new(),
        }
    }

    /// Attaches a description to the request.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Assigns the task to a user on creation.
    #[must_use]
    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Declares the tasks the new task depends on.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: BTreeSet<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// Payload for editing a task.
///
/// The title is always submitted; every other field falls back to the
/// stored value when omitted. A present but blank description clears the
/// stored one. Omitted dependencies leave the dependency set untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: String,
    description: Option<String>,
    kind: Option<TaskKind>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
    dependencies: Option<BTreeSet<TaskId>>,
}

impl UpdateTaskRequest {
    /// Creates a request that only re-submits the title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind: None,
            priority: None,
            due_date: None,
            dependencies: None,
        }
    }

    /// Replaces the stored description, clearing it when blank.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the stored classification.
    #[must_use]
    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Replaces the stored urgency.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the stored due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces the stored dependency set.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: BTreeSet<TaskId>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }
}

/// Task management service.
///
/// Every operation authorizes the actor before touching state. Reads go
/// through the listing cache where a key scheme exists; mutations
/// invalidate the cached entries they may have staled. Status changes are
/// out of scope here and live in [`super::StatusEngine`].
#[derive(Clone)]
pub struct TaskService<S, L, C>
where
    S: TaskStore,
    L: ListingCache,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    cache: Arc<L>,
    policy: Arc<TaskPolicy>,
    clock: Arc<C>,
}

impl<S, L, C> TaskService<S, L, C>
where
    S: TaskStore,
    L: ListingCache,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(store: Arc<S>, cache: Arc<L>, policy: Arc<TaskPolicy>, clock: Arc<C>) -> Self {
        Self {
            store,
            cache,
            policy,
            clock,
        }
    }

    /// Creates a task owned by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Unauthorized`] when the actor may not
    /// create tasks, [`TaskServiceError::Validation`] when a field fails
    /// domain validation, [`TaskServiceError::DuplicateTitle`] when a live
    /// task already uses the title, and
    /// [`TaskServiceError::UnknownDependency`] or
    /// [`TaskServiceError::Validation`] when the dependency set is invalid.
    pub async fn create(
        &self,
        request: CreateTaskRequest,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        self.policy.authorize(actor, TaskAction::Create, None)?;

        let CreateTaskRequest {
            title: raw_title,
            description: raw_description,
            kind,
            priority,
            due_date,
            assigned_to,
            dependencies,
        } = request;
        let title = TaskTitle::new(&raw_title)?;
        let description = parse_description(raw_description.as_deref())?;
        let task = Task::create(
            NewTaskData {
                title,
                description,
                kind,
                priority,
                due_date,
                created_by: actor.id(),
                assigned_to,
            },
            &*self.clock,
        )?;

        self.store
            .insert(&task, &dependencies)
            .await
            .map_err(|err| store_failure("create", err))?;
        self.invalidate_listings().await;
        Ok(task)
    }

    /// Fetches a task detail, serving the cached copy when fresh.
    ///
    /// The detail is cached before the view policy runs, so a denied
    /// actor never invalidates or bypasses the shared entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed, [`TaskServiceError::Unauthorized`] when the actor may not
    /// view it, and [`TaskServiceError::Internal`] when the cache backend
    /// fails a read.
    pub async fn show(&self, task_id: TaskId, actor: &Actor) -> TaskServiceResult<TaskDetail> {
        let key = CacheKey::task(task_id);
        if let Some(value) = self
            .cache
            .get(&key)
            .await
            .map_err(|err| cache_failure("show", err))?
        {
            match serde_json::from_value::<TaskDetail>(value) {
                Ok(detail) => {
                    self.policy.authorize(
                        actor,
                        TaskAction::View,
                        Some(&detail.task.ownership()),
                    )?;
                    return Ok(detail);
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "discarding malformed cache entry");
                }
            }
        }

        let detail = self
            .store
            .detail(task_id)
            .await
            .map_err(|err| store_failure("show", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.cache_value(&key, &detail).await;
        self.policy
            .authorize(actor, TaskAction::View, Some(&detail.task.ownership()))?;
        Ok(detail)
    }

    /// Lists live tasks matching the filter, cached per filter signature.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Unauthorized`] unless the actor may
    /// list every task, and [`TaskServiceError::Internal`] when the cache
    /// backend fails a read.
    pub async fn list(&self, filter: TaskFilter, actor: &Actor) -> TaskServiceResult<Vec<Task>> {
        self.policy.authorize(actor, TaskAction::ListAll, None)?;

        let key = CacheKey::list(&filter);
        if let Some(tasks) = self.cached_tasks(&key, "list").await? {
            return Ok(tasks);
        }
        let tasks = self
            .store
            .list(&filter)
            .await
            .map_err(|err| store_failure("list", err))?;
        self.cache_value(&key, &tasks).await;
        Ok(tasks)
    }

    /// Lists blocked tasks whose due date lies before `today`, cached per
    /// day.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Unauthorized`] unless the actor may
    /// list blocked tasks, and [`TaskServiceError::Internal`] when the
    /// cache backend fails a read.
    pub async fn blocked(&self, today: NaiveDate, actor: &Actor) -> TaskServiceResult<Vec<Task>> {
        self.policy.authorize(actor, TaskAction::ListBlocked, None)?;

        let key = CacheKey::blocked(today);
        if let Some(tasks) = self.cached_tasks(&key, "blocked").await? {
            return Ok(tasks);
        }
        let tasks = self
            .store
            .list_blocked_before(today)
            .await
            .map_err(|err| store_failure("blocked", err))?;
        self.cache_value(&key, &tasks).await;
        Ok(tasks)
    }

    /// Lists trashed tasks with their child records, uncached.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Unauthorized`] unless the actor may
    /// list trashed tasks.
    pub async fn trashed(&self, actor: &Actor) -> TaskServiceResult<Vec<TaskDetail>> {
        self.policy.authorize(actor, TaskAction::ListTrashed, None)?;
        self.store
            .list_trashed()
            .await
            .map_err(|err| store_failure("trashed", err))
    }

    /// Edits a task, replacing its dependency set when one is submitted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed, [`TaskServiceError::Unauthorized`] when the actor may not
    /// update it, [`TaskServiceError::Validation`] when a field or the
    /// dependency set fails domain validation, and
    /// [`TaskServiceError::DuplicateTitle`] when the new title collides
    /// with another live task.
    pub async fn update(
        &self,
        task_id: TaskId,
        request: UpdateTaskRequest,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        let mut task = self
            .store
            .find(task_id)
            .await
            .map_err(|err| store_failure("update", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, TaskAction::Update, Some(&task.ownership()))?;

        let UpdateTaskRequest {
            title: raw_title,
            description: raw_description,
            kind,
            priority,
            due_date,
            dependencies,
        } = request;
        let title = TaskTitle::new(&raw_title)?;
        let description = match raw_description.as_deref() {
            None => task.description().cloned(),
            Some(submitted) => parse_description(Some(submitted))?,
        };
        let edit = TaskEdit {
            title,
            description,
            kind: kind.unwrap_or(task.kind()),
            priority: priority.unwrap_or(task.priority()),
            due_date: due_date.unwrap_or(task.due_date()),
        };
        task.apply_edit(edit, &*self.clock);

        self.store
            .update(&task, dependencies.as_ref())
            .await
            .map_err(|err| store_failure("update", err))?;
        self.invalidate_tasks(&[task_id]).await;
        self.invalidate_listings().await;
        Ok(task)
    }

    /// Trashes a task together with its live dependent closure.
    ///
    /// Returns the trashed task identifiers, the root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// already trashed and [`TaskServiceError::Unauthorized`] when the
    /// actor may not delete it.
    pub async fn destroy(&self, task_id: TaskId, actor: &Actor) -> TaskServiceResult<Vec<TaskId>> {
        let task = self
            .store
            .find(task_id)
            .await
            .map_err(|err| store_failure("destroy", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, TaskAction::Delete, Some(&task.ownership()))?;

        let removed = self
            .store
            .delete_tree(task_id, self.clock.utc())
            .await
            .map_err(|err| store_failure("destroy", err))?;
        self.invalidate_tasks(&removed).await;
        self.invalidate_listings().await;
        Ok(removed)
    }

    /// Restores a trashed task together with its trashed dependent
    /// closure.
    ///
    /// Returns the restored task identifiers, the root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// not trashed and [`TaskServiceError::Unauthorized`] when the actor
    /// may not restore it.
    pub async fn restore(&self, task_id: TaskId, actor: &Actor) -> TaskServiceResult<Vec<TaskId>> {
        let task = self
            .store
            .find_with_deleted(task_id)
            .await
            .map_err(|err| store_failure("restore", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, TaskAction::Restore, Some(&task.ownership()))?;

        let restored = self
            .store
            .restore_tree(task_id, self.clock.utc())
            .await
            .map_err(|err| store_failure("restore", err))?;
        self.invalidate_tasks(&restored).await;
        self.invalidate_listings().await;
        Ok(restored)
    }

    /// Purges a task together with its full dependent closure, child
    /// records, and audit trail.
    ///
    /// Returns the purged task identifiers, the root first. Purged rows
    /// are unrecoverable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent and
    /// [`TaskServiceError::Unauthorized`] when the actor may not purge it.
    pub async fn force_delete(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> TaskServiceResult<Vec<TaskId>> {
        let task = self
            .store
            .find_with_deleted(task_id)
            .await
            .map_err(|err| store_failure("force_delete", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, TaskAction::ForceDelete, Some(&task.ownership()))?;

        let purged = self
            .store
            .purge_tree(task_id)
            .await
            .map_err(|err| store_failure("force_delete", err))?;
        self.invalidate_tasks(&purged).await;
        self.invalidate_listings().await;
        Ok(purged)
    }

    /// Assigns an unassigned task to a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed and [`TaskServiceError::Unauthorized`] when the actor may
    /// not assign it.
    pub async fn assign(
        &self,
        task_id: TaskId,
        assignee: UserId,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        self.set_assignee(task_id, assignee, TaskAction::Assign, actor)
            .await
    }

    /// Moves a task to a new assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed and [`TaskServiceError::Unauthorized`] when the actor may
    /// not reassign it.
    pub async fn reassign(
        &self,
        task_id: TaskId,
        assignee: UserId,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        self.set_assignee(task_id, assignee, TaskAction::Reassign, actor)
            .await
    }

    /// Adds a comment to a live task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed and [`TaskServiceError::Unauthorized`] when the actor may
    /// not comment.
    pub async fn add_comment(
        &self,
        task_id: TaskId,
        body: impl Into<String> + Send,
        actor: &Actor,
    ) -> TaskServiceResult<Comment> {
        let task = self
            .store
            .find(task_id)
            .await
            .map_err(|err| store_failure("add_comment", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, TaskAction::Comment, Some(&task.ownership()))?;

        let comment = Comment::new(OwnerRef::task(task_id), actor.id(), body, &*self.clock);
        self.store
            .add_comment(&comment)
            .await
            .map_err(|err| store_failure("add_comment", err))?;
        self.invalidate_tasks(&[task_id]).await;
        Ok(comment)
    }

    /// Records an attachment on a live task.
    ///
    /// Only the metadata is recorded; upload, scanning, and storage of
    /// the file body happen elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed and [`TaskServiceError::Unauthorized`] when the actor may
    /// not attach files.
    pub async fn add_attachment(
        &self,
        task_id: TaskId,
        file_name: impl Into<String> + Send,
        media_type: impl Into<String> + Send,
        actor: &Actor,
    ) -> TaskServiceResult<Attachment> {
        let task = self
            .store
            .find(task_id)
            .await
            .map_err(|err| store_failure("add_attachment", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, TaskAction::AttachFile, Some(&task.ownership()))?;

        let attachment = Attachment::new(
            OwnerRef::task(task_id),
            actor.id(),
            file_name,
            media_type,
            &*self.clock,
        );
        self.store
            .add_attachment(&attachment)
            .await
            .map_err(|err| store_failure("add_attachment", err))?;
        self.invalidate_tasks(&[task_id]).await;
        Ok(attachment)
    }

    async fn set_assignee(
        &self,
        task_id: TaskId,
        assignee: UserId,
        action: TaskAction,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        let mut task = self
            .store
            .find(task_id)
            .await
            .map_err(|err| store_failure("assign", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.policy
            .authorize(actor, action, Some(&task.ownership()))?;

        task.set_assignee(assignee, &*self.clock);
        self.store
            .update(&task, None)
            .await
            .map_err(|err| store_failure("assign", err))?;
        self.invalidate_tasks(&[task_id]).await;
        self.invalidate_listings().await;
        Ok(task)
    }

    /// Reads a cached task listing, discarding malformed entries.
    async fn cached_tasks(
        &self,
        key: &CacheKey,
        operation: &'static str,
    ) -> TaskServiceResult<Option<Vec<Task>>> {
        let Some(value) = self
            .cache
            .get(key)
            .await
            .map_err(|err| cache_failure(operation, err))?
        else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(tasks) => Ok(Some(tasks)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "discarding malformed cache entry");
                Ok(None)
            }
        }
    }

    /// Caches a serializable value, logging and swallowing failures.
    async fn cache_value<T: serde::Serialize>(&self, key: &CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                if let Err(err) = self.cache.put(key, json).await {
                    tracing::warn!(key = %key, error = %err, "cache write failed");
                }
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "cache serialization failed");
            }
        }
    }

    /// Drops the cached detail of each given task, logging and swallowing
    /// failures. Stale entries age out via the TTL regardless.
    async fn invalidate_tasks(&self, ids: &[TaskId]) {
        for id in ids {
            if let Err(err) = self.cache.forget(&CacheKey::task(*id)).await {
                tracing::warn!(task_id = %id, error = %err, "cache invalidation failed");
            }
        }
    }

    /// Drops every cached listing, logging and swallowing failures.
    async fn invalidate_listings(&self) {
        for prefix in [CacheKey::LIST_PREFIX, CacheKey::BLOCKED_PREFIX] {
            if let Err(err) = self.cache.forget_prefix(prefix).await {
                tracing::warn!(prefix, error = %err, "cache invalidation failed");
            }
        }
    }
}

/// Parses an optional submitted description, treating blank input as
/// absent.
fn parse_description(raw: Option<&str>) -> Result<Option<TaskDescription>, TaskServiceError> {
    match raw {
        None => Ok(None),
        Some(submitted) if submitted.trim().is_empty() => Ok(None),
        Some(submitted) => Ok(Some(TaskDescription::new(submitted)?)),
    }
}
