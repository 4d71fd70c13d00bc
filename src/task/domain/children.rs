//! Child records owned by a task: comments and file attachments.

use super::{AttachmentId, CommentId, TaskId};
use crate::access::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind tag of the entity that owns a child record.
///
/// Child records carry a typed owner reference instead of resolving owner
/// types dynamically; tasks are the only owning entity today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    /// The child record belongs to a task.
    Task,
}

/// Typed reference to the entity owning a child record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    kind: OwnerKind,
    id: Uuid,
}

impl OwnerRef {
    /// Builds an owner reference pointing at a task.
    #[must_use]
    pub const fn task(task_id: TaskId) -> Self {
        Self {
            kind: OwnerKind::Task,
            id: task_id.into_inner(),
        }
    }

    /// Returns the owner kind tag.
    #[must_use]
    pub const fn kind(self) -> OwnerKind {
        self.kind
    }

    /// Returns the owning task identifier.
    ///
    /// Total while tasks are the only owning entity; the signature gains
    /// an `Option` if another owner kind ever appears.
    #[must_use]
    pub const fn task_id(self) -> TaskId {
        match self.kind {
            OwnerKind::Task => TaskId::from_uuid(self.id),
        }
    }
}

/// Comment left on a task.
///
/// Comments are soft-deletable independently of their owner and follow the
/// owning task through soft-delete, restore, and force-delete cascades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    owner: OwnerRef,
    author: UserId,
    body: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment on the given owner.
    #[must_use]
    pub fn new(owner: OwnerRef, author: UserId, body: impl Into<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CommentId::new(),
            owner,
            author,
            body: body.into().trim().to_owned(),
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the owner reference.
    #[must_use]
    pub const fn owner(&self) -> OwnerRef {
        self.owner
    }

    /// Returns the user who wrote the comment.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the soft-delete timestamp, if the comment is trashed.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the comment is currently trashed.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the comment as trashed.
    pub(crate) fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    /// Clears the trashed marker.
    pub(crate) fn clear_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = None;
        self.updated_at = at;
    }
}

/// File attachment uploaded to a task.
///
/// Only descriptive metadata lives here; the file bytes themselves are held
/// by external object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    owner: OwnerRef,
    uploaded_by: UserId,
    file_name: String,
    media_type: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Attachment {
    /// Creates a new attachment record on the given owner.
    #[must_use]
    pub fn new(
        owner: OwnerRef,
        uploaded_by: UserId,
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AttachmentId::new(),
            owner,
            uploaded_by,
            file_name: file_name.into(),
            media_type: media_type.into(),
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the owner reference.
    #[must_use]
    pub const fn owner(&self) -> OwnerRef {
        self.owner
    }

    /// Returns the user who uploaded the file.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the stored file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the declared media type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the soft-delete timestamp, if the attachment is trashed.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the attachment is currently trashed.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the attachment as trashed.
    pub(crate) fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    /// Clears the trashed marker.
    pub(crate) fn clear_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = None;
        self.updated_at = at;
    }
}
