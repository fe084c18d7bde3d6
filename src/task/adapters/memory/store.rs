//! In-memory task store.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::task::{
    domain::{OwnerId, SearchQuery, Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

type TaskMap = HashMap<TaskId, Task>;

/// Thread-safe in-memory task store.
///
/// Reads share a [`RwLock`]; `save` and `delete` take it exclusively. Tasks
/// are cloned in and out, so callers never alias stored state. Clones of the
/// store share the same map.
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    tasks: Arc<RwLock<TaskMap>>,
    clock: Arc<C>,
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DefaultClock)
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store with the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            clock: Arc::new(clock),
        }
    }

    /// Returns the number of stored records, soft-deleted ones included.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] when the lock is poisoned.
    pub fn len(&self) -> TaskStoreResult<usize> {
        Ok(self.read_tasks()?.len())
    }

    /// Returns `true` if nothing has ever been saved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] when the lock is poisoned.
    pub fn is_empty(&self) -> TaskStoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read_tasks(&self) -> TaskStoreResult<RwLockReadGuard<'_, TaskMap>> {
        self.tasks
            .read()
            .map_err(|err| TaskStoreError::storage(std::io::Error::other(err.to_string())))
    }

    fn write_tasks(&self) -> TaskStoreResult<RwLockWriteGuard<'_, TaskMap>> {
        self.tasks
            .write()
            .map_err(|err| TaskStoreError::storage(std::io::Error::other(err.to_string())))
    }

    /// Collects visible tasks accepted by `predicate`, newest first.
    fn collect_visible<F>(&self, predicate: F) -> TaskStoreResult<Vec<Task>>
    where
        F: Fn(&Task) -> bool,
    {
        let tasks = self.read_tasks()?;
        let mut found: Vec<Task> = tasks
            .values()
            .filter(|task| !task.is_deleted() && predicate(task))
            .cloned()
            .collect();
        drop(tasks);
        sort_newest_first(&mut found);
        Ok(found)
    }
}

impl<C> Clone for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("records", &self.len().ok())
            .finish_non_exhaustive()
    }
}

/// Orders by creation time descending, then identifier ascending.
fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        right
            .created_at()
            .cmp(&left.created_at())
            .then_with(|| left.id().cmp(&right.id()))
    });
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn get(&self, id: TaskId) -> TaskStoreResult<Task> {
        let tasks = self.read_tasks()?;
        let task = tasks
            .get(&id)
            .filter(|task| !task.is_deleted())
            .cloned()
            .ok_or(TaskStoreError::NotFound(id))?;
        debug!(task_id = %id, "loaded task");
        Ok(task)
    }

    async fn get_all(&self) -> TaskStoreResult<Vec<Task>> {
        self.collect_visible(|_| true)
    }

    async fn get_all_by_owner(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        self.collect_visible(|task| task.owner_id() == owner)
    }

    async fn get_by_status(&self, status: TaskStatus) -> TaskStoreResult<Vec<Task>> {
        self.collect_visible(|task| task.status() == status)
    }

    async fn get_by_status_and_owner(
        &self,
        status: TaskStatus,
        owner: &OwnerId,
    ) -> TaskStoreResult<Vec<Task>> {
        self.collect_visible(|task| task.status() == status && task.owner_id() == owner)
    }

    async fn search(&self, query: &str) -> TaskStoreResult<Vec<Task>> {
        let needle = SearchQuery::new(query);
        self.collect_visible(|task| needle.matches(task))
    }

    async fn search_by_owner(
        &self,
        query: &str,
        owner: &OwnerId,
    ) -> TaskStoreResult<Vec<Task>> {
        let needle = SearchQuery::new(query);
        self.collect_visible(|task| task.owner_id() == owner && needle.matches(task))
    }

    async fn save(&self, task: &mut Task) -> TaskStoreResult<()> {
        task.validate()?;

        let mut tasks = self.write_tasks()?;
        if tasks.get(&task.id()).is_some_and(Task::is_deleted) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        task.touch(&*self.clock);
        tasks.insert(task.id(), task.clone());
        drop(tasks);

        info!(
            task_id = %task.id(),
            owner = %task.owner_id(),
            status = %task.status(),
            "saved task"
        );
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut tasks = self.write_tasks()?;
        let task = tasks
            .get_mut(&id)
            .filter(|task| !task.is_deleted())
            .ok_or(TaskStoreError::NotFound(id))?;
        task.delete(&*self.clock);
        drop(tasks);

        info!(task_id = %id, "soft-deleted task");
        Ok(())
    }
}
