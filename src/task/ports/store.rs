//! Storage port for tasks and projects.

use crate::task::domain::{OwnerId, Task, TaskDomainError, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Every implementation hides soft-deleted tasks from all read operations and
/// returns lists ordered by creation time, newest first, with ties broken by
/// ascending task identifier.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns the task with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist or
    /// has been soft-deleted.
    async fn get(&self, id: TaskId) -> TaskStoreResult<Task>;

    /// Returns every visible task.
    async fn get_all(&self) -> TaskStoreResult<Vec<Task>>;

    /// Returns every visible task belonging to `owner`.
    async fn get_all_by_owner(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>>;

    /// Returns every visible task with exactly the given status.
    async fn get_by_status(&self, status: TaskStatus) -> TaskStoreResult<Vec<Task>>;

    /// Returns every visible task of `owner` with exactly the given status.
    async fn get_by_status_and_owner(
        &self,
        status: TaskStatus,
        owner: &OwnerId,
    ) -> TaskStoreResult<Vec<Task>>;

    /// Returns every visible task whose title, description, contexts, or tags
    /// contain `query`, ignoring case.
    ///
    /// The empty query matches every visible task; callers that want
    /// different behaviour must special-case it.
    async fn search(&self, query: &str) -> TaskStoreResult<Vec<Task>>;

    /// Scoped variant of [`TaskStore::search`].
    async fn search_by_owner(&self, query: &str, owner: &OwnerId)
    -> TaskStoreResult<Vec<Task>>;

    /// Validates and upserts a task, refreshing its `updated_at` in place.
    ///
    /// The stored record is fully replaced by `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Validation`] before touching storage when
    /// the task is invalid, [`TaskStoreError::NotFound`] when the stored
    /// record with the same identifier has been soft-deleted, and
    /// [`TaskStoreError::Storage`] on backend failure.
    async fn save(&self, task: &mut Task) -> TaskStoreResult<()>;

    /// Soft-deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist or
    /// is already deleted.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task does not exist or is soft-deleted.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task failed validation and was not stored.
    #[error("task validation failed: {0}")]
    Validation(#[from] TaskDomainError),

    /// Backend I/O or connectivity failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a backend error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
