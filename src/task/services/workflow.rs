//! Owner-scoped GTD workflow operations over a [`TaskStore`].

use crate::task::{
    domain::{EnergyLevel, OwnerId, Task, TaskDomainError, TaskId, TaskStatus, Timeframe},
    ports::{TaskStore, TaskStoreError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for capturing a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTaskRequest {
    title: String,
    owner_id: OwnerId,
    description: Option<String>,
    contexts: Vec<String>,
    tags: Vec<String>,
    due_date: Option<DateTime<Utc>>,
    project_id: Option<TaskId>,
}

impl CaptureTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, owner_id: OwnerId) -> Self {
        Self {
            title: title.into(),
            owner_id,
            description: None,
            contexts: Vec::new(),
            tags: Vec::new(),
            due_date: None,
            project_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the context labels.
    #[must_use]
    pub fn with_contexts(mut self, contexts: impl IntoIterator<Item = String>) -> Self {
        self.contexts = contexts.into_iter().collect();
        self
    }

    /// Sets the tag labels.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Places the captured task in a project.
    #[must_use]
    pub const fn with_project(mut self, project_id: TaskId) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// A status change requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTransition {
    /// Move to `next`.
    Next,
    /// Move to `waiting`.
    Waiting,
    /// Move to `someday`.
    Someday,
    /// Move to `done`, stamping the completion time.
    Done,
    /// Promote to a project.
    Project,
    /// Schedule for the given date.
    Scheduled(DateTime<Utc>),
}

/// Full replacement of a task's descriptive fields.
///
/// Status and lifecycle timestamps are not part of an update; use
/// [`TaskWorkflowService::apply`] for those.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    pub title: String,
    /// New description.
    pub description: Option<String>,
    /// New project.
    pub project_id: Option<TaskId>,
    /// New parent task.
    pub parent_id: Option<TaskId>,
    /// New context labels.
    pub contexts: Vec<String>,
    /// New tag labels.
    pub tags: Vec<String>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New estimate in minutes.
    pub time_estimate: Option<u32>,
    /// New energy level.
    pub energy_required: Option<EnergyLevel>,
    /// New priority.
    pub priority: Option<u8>,
    /// New timeframe.
    pub timeframe: Option<Timeframe>,
    /// New recurrence flag.
    pub is_recurring: bool,
    /// New recurrence rule.
    pub recurring_rule: Option<String>,
}

/// Per-status task counts for one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    counts: HashMap<TaskStatus, usize>,
    total: usize,
}

impl StatusSummary {
    fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts = HashMap::new();
        for task in tasks {
            *counts.entry(task.status()).or_insert(0) += 1;
        }
        Self {
            counts,
            total: tasks.len(),
        }
    }

    /// Returns the number of tasks with `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Returns the number of non-deleted tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Iterates over every status with its count, zero counts included.
    pub fn by_status(&self) -> impl Iterator<Item = (TaskStatus, usize)> + '_ {
        TaskStatus::ALL
            .into_iter()
            .map(|status| (status, self.count(status)))
    }
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The operation requires a task with status `project`.
    #[error("task {0} is not a project")]
    NotAProject(TaskId),
}

/// Result type for workflow operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// GTD workflow orchestration service.
///
/// Every operation is scoped to an owner. A task that belongs to someone
/// else is reported as [`TaskStoreError::NotFound`].
#[derive(Clone)]
pub struct TaskWorkflowService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskWorkflowService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Captures a new inbox task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Domain`] when the title is blank, or
    /// [`TaskWorkflowError::Store`] when the store rejects the write.
    pub async fn capture(&self, request: CaptureTaskRequest) -> TaskWorkflowResult<Task> {
        let mut task = self.build_task(request)?;
        self.store.save(&mut task).await?;
        info!(task_id = %task.id(), owner = %task.owner_id(), "captured task");
        Ok(task)
    }

    /// Captures a new task directly as a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Domain`] when the title is blank, or
    /// [`TaskWorkflowError::Store`] when the store rejects the write.
    pub async fn create_project(&self, request: CaptureTaskRequest) -> TaskWorkflowResult<Task> {
        let mut project = self.build_task(request)?;
        project.mark_as_project(&*self.clock);
        self.store.save(&mut project).await?;
        info!(project_id = %project.id(), owner = %project.owner_id(), "created project");
        Ok(project)
    }

    /// Loads a task visible to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] (wrapped) when the task is
    /// missing, deleted, or owned by someone else.
    pub async fn find(&self, id: TaskId, owner: &OwnerId) -> TaskWorkflowResult<Task> {
        let task = self.store.get(id).await?;
        if task.owner_id() != owner {
            debug!(task_id = %id, owner = %owner, "task hidden from non-owner");
            return Err(TaskStoreError::NotFound(id).into());
        }
        Ok(task)
    }

    /// Applies a status transition and saves the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Store`] when the task is not visible to
    /// `owner` or the save fails.
    pub async fn apply(
        &self,
        id: TaskId,
        owner: &OwnerId,
        transition: TaskTransition,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.find(id, owner).await?;
        let clock = &*self.clock;
        match transition {
            TaskTransition::Next => task.mark_as_next(clock),
            TaskTransition::Waiting => task.mark_as_waiting(clock),
            TaskTransition::Someday => task.mark_as_someday(clock),
            TaskTransition::Done => task.mark_as_done(clock),
            TaskTransition::Project => task.mark_as_project(clock),
            TaskTransition::Scheduled(date) => task.mark_as_scheduled(date, clock),
        }
        self.store.save(&mut task).await?;
        info!(task_id = %id, status = %task.status(), "applied transition");
        Ok(task)
    }

    /// Replaces the descriptive fields of a task and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Domain`] when the new title is blank, or
    /// [`TaskWorkflowError::Store`] when the task is not visible to `owner`
    /// or the save fails.
    pub async fn update(
        &self,
        id: TaskId,
        owner: &OwnerId,
        update: TaskUpdate,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.find(id, owner).await?;
        let TaskUpdate {
            title,
            description,
            project_id,
            parent_id,
            contexts,
            tags,
            due_date,
            time_estimate,
            energy_required,
            priority,
            timeframe,
            is_recurring,
            recurring_rule,
        } = update;

        task.set_title(title);
        task.set_description(description);
        task.set_project(project_id);
        task.set_parent(parent_id);
        task.set_contexts(contexts);
        task.set_tags(tags);
        task.set_due_date(due_date);
        task.set_time_estimate(time_estimate);
        task.set_energy_required(energy_required);
        task.set_priority(priority);
        task.set_timeframe(timeframe);
        task.set_recurrence(is_recurring, recurring_rule);
        task.validate()?;

        self.store.save(&mut task).await?;
        info!(task_id = %id, "updated task");
        Ok(task)
    }

    /// Marks a project as done.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotAProject`] when the task is not a
    /// project, or [`TaskWorkflowError::Store`] when it is not visible to
    /// `owner` or the save fails.
    pub async fn complete_project(&self, id: TaskId, owner: &OwnerId) -> TaskWorkflowResult<Task> {
        let mut project = self.find_project(id, owner).await?;
        project.mark_as_done(&*self.clock);
        self.store.save(&mut project).await?;
        info!(project_id = %id, "completed project");
        Ok(project)
    }

    /// Places an existing task inside a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotAProject`] when `project_id` is not a
    /// project, or [`TaskWorkflowError::Store`] when either task is not
    /// visible to `owner` or the save fails.
    pub async fn add_task_to_project(
        &self,
        project_id: TaskId,
        task_id: TaskId,
        owner: &OwnerId,
    ) -> TaskWorkflowResult<Task> {
        self.find_project(project_id, owner).await?;
        let mut task = self.find(task_id, owner).await?;
        task.set_project(Some(project_id));
        self.store.save(&mut task).await?;
        info!(%project_id, %task_id, "added task to project");
        Ok(task)
    }

    /// Lists the visible tasks of a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotAProject`] when `project_id` is not a
    /// project, or [`TaskWorkflowError::Store`] on lookup failure.
    pub async fn project_tasks(
        &self,
        project_id: TaskId,
        owner: &OwnerId,
    ) -> TaskWorkflowResult<Vec<Task>> {
        self.find_project(project_id, owner).await?;
        let tasks = self.store.get_all_by_owner(owner).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.project_id() == Some(project_id))
            .collect())
    }

    /// Lists the owner's tasks that belong to no project and are not
    /// projects themselves.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Store`] on lookup failure.
    pub async fn unassigned_tasks(&self, owner: &OwnerId) -> TaskWorkflowResult<Vec<Task>> {
        let tasks = self.store.get_all_by_owner(owner).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.project_id().is_none() && !task.is_project())
            .collect())
    }

    /// Searches the owner's visible tasks.
    ///
    /// An empty query returns no tasks without consulting the store, unlike
    /// [`TaskStore::search_by_owner`], which matches everything.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Store`] on lookup failure.
    pub async fn search(&self, query: &str, owner: &OwnerId) -> TaskWorkflowResult<Vec<Task>> {
        if query.is_empty() {
            debug!(owner = %owner, "empty search query");
            return Ok(Vec::new());
        }
        let found = self.store.search_by_owner(query, owner).await?;
        debug!(owner = %owner, matches = found.len(), "searched tasks");
        Ok(found)
    }

    /// Counts the owner's visible tasks per status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Store`] on lookup failure.
    pub async fn status_summary(&self, owner: &OwnerId) -> TaskWorkflowResult<StatusSummary> {
        let tasks = self.store.get_all_by_owner(owner).await?;
        let summary = StatusSummary::from_tasks(&tasks);
        debug!(owner = %owner, total = summary.total(), "computed status summary");
        Ok(summary)
    }

    /// Soft-deletes a task visible to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Store`] when the task is not visible to
    /// `owner` or the delete fails.
    pub async fn delete(&self, id: TaskId, owner: &OwnerId) -> TaskWorkflowResult<()> {
        self.find(id, owner).await?;
        self.store.delete(id).await?;
        Ok(())
    }

    async fn find_project(&self, id: TaskId, owner: &OwnerId) -> TaskWorkflowResult<Task> {
        let task = self.find(id, owner).await?;
        if !task.is_project() {
            return Err(TaskWorkflowError::NotAProject(id));
        }
        Ok(task)
    }

    fn build_task(&self, request: CaptureTaskRequest) -> TaskWorkflowResult<Task> {
        let CaptureTaskRequest {
            title,
            owner_id,
            description,
            contexts,
            tags,
            due_date,
            project_id,
        } = request;

        let mut task = Task::new(title, description, owner_id, &*self.clock);
        task.set_contexts(contexts);
        task.set_tags(tags);
        task.set_due_date(due_date);
        task.set_project(project_id);
        task.validate()?;
        Ok(task)
    }
}
