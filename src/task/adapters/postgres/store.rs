//! `PostgreSQL` task store.

use super::{models::TaskRow, schema::tasks};
use crate::config::DatabaseConfig;
use crate::task::{
    domain::{
        EnergyLevel, OwnerId, PersistedTaskData, SearchQuery, Task, TaskId, TaskStatus, Timeframe,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sql_types::{
    BigInt, Bool, Jsonb, Nullable, SmallInt, Text, Timestamptz, Uuid as SqlUuid, Varchar,
};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// `PostgreSQL` connection pool type used by the task store.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

const SCHEMA_SQL: &str = include_str!("../../../../migrations/2026-10-19-000000_create_tasks/up.sql");

// The WHERE clause on the update arm leaves soft-deleted rows untouched and
// reports zero affected rows for them.
const UPSERT_SQL: &str = concat!(
    "INSERT INTO tasks (id, title, description, status, owner_id, project_id, parent_id, ",
    "contexts, tags, due_date, scheduled_date, time_estimate, energy_required, priority, ",
    "timeframe, is_recurring, recurring_rule, created_at, updated_at, completed_at, deleted_at) ",
    "VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, ",
    "$18, $19, $20, $21) ",
    "ON CONFLICT (id) DO UPDATE SET ",
    "title = EXCLUDED.title, description = EXCLUDED.description, status = EXCLUDED.status, ",
    "owner_id = EXCLUDED.owner_id, project_id = EXCLUDED.project_id, ",
    "parent_id = EXCLUDED.parent_id, contexts = EXCLUDED.contexts, tags = EXCLUDED.tags, ",
    "due_date = EXCLUDED.due_date, scheduled_date = EXCLUDED.scheduled_date, ",
    "time_estimate = EXCLUDED.time_estimate, energy_required = EXCLUDED.energy_required, ",
    "priority = EXCLUDED.priority, timeframe = EXCLUDED.timeframe, ",
    "is_recurring = EXCLUDED.is_recurring, recurring_rule = EXCLUDED.recurring_rule, ",
    "created_at = EXCLUDED.created_at, updated_at = EXCLUDED.updated_at, ",
    "completed_at = EXCLUDED.completed_at, deleted_at = EXCLUDED.deleted_at ",
    "WHERE tasks.deleted_at IS NULL",
);

/// `PostgreSQL`-backed task store.
///
/// All Diesel calls run on the blocking thread pool. Row-level locking in
/// `delete` and the conditional upsert in `save` keep concurrent writers
/// from resurrecting soft-deleted tasks.
pub struct PostgresTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync + 'static,
{
    pool: TaskPgPool,
    clock: Arc<C>,
}

impl PostgresTaskStore<DefaultClock> {
    /// Creates a store from an existing pool, using the system clock.
    ///
    /// The schema is not created; call [`PostgresTaskStore::ensure_schema`]
    /// when the database may be empty.
    #[must_use]
    pub fn new(pool: TaskPgPool) -> Self {
        Self::with_clock(pool, DefaultClock)
    }

    /// Builds a connection pool from `config`, checks connectivity, and
    /// creates the `tasks` table and its indexes when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] when the pool cannot be built,
    /// no connection can be checked out, or the schema statements fail.
    pub async fn connect(config: &DatabaseConfig) -> TaskStoreResult<Self> {
        let url = config.connection_url();
        let max_size = config.pool_size();
        info!(
            host = config.host(),
            port = config.port(),
            database = config.database(),
            pool_size = max_size,
            "connecting task store"
        );

        let pool = tokio::task::spawn_blocking(move || {
            let manager = ConnectionManager::<PgConnection>::new(url);
            let built = Pool::builder()
                .max_size(max_size)
                .build(manager)
                .map_err(TaskStoreError::storage)?;
            let mut connection = built.get().map_err(TaskStoreError::storage)?;
            connection.batch_execute(SCHEMA_SQL)?;
            Ok::<_, TaskStoreError>(built)
        })
        .await
        .map_err(TaskStoreError::storage)?
        .inspect_err(|err| warn!(error = %err, "task store connection failed"))?;

        Ok(Self::new(pool))
    }
}

impl<C> PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a store from an existing pool and clock.
    #[must_use]
    pub fn with_clock(pool: TaskPgPool, clock: C) -> Self {
        Self {
            pool,
            clock: Arc::new(clock),
        }
    }

    /// Creates the `tasks` table and its indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] when the statements fail.
    pub async fn ensure_schema(&self) -> TaskStoreResult<()> {
        self.run_blocking(|connection| {
            connection.batch_execute(SCHEMA_SQL)?;
            Ok(())
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::storage)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::storage)?
        .inspect_err(|err| {
            if matches!(err, TaskStoreError::Storage(_)) {
                warn!(error = %err, "task store operation failed");
            }
        })
    }

    async fn load_visible(
        &self,
        owner: Option<&OwnerId>,
        status: Option<TaskStatus>,
    ) -> TaskStoreResult<Vec<Task>> {
        let owner_filter = owner.map(|value| value.as_str().to_owned());
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .filter(tasks::deleted_at.is_null())
                .into_boxed();
            if let Some(owner_id) = owner_filter {
                query = query.filter(tasks::owner_id.eq(owner_id));
            }
            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            let rows = query
                .order_by((tasks::created_at.desc(), tasks::id.asc()))
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    // Matches with `SearchQuery`, the same folding the in-memory store uses,
    // independent of the database collation.
    async fn search_visible(
        &self,
        query: &str,
        owner: Option<&OwnerId>,
    ) -> TaskStoreResult<Vec<Task>> {
        let needle = SearchQuery::new(query);
        let candidates = self.load_visible(owner, None).await?;
        let found: Vec<Task> = candidates
            .into_iter()
            .filter(|task| needle.matches(task))
            .collect();
        debug!(matches = found.len(), "searched tasks");
        Ok(found)
    }
}

impl<C> Clone for PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTaskStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl From<DieselError> for TaskStoreError {
    fn from(err: DieselError) -> Self {
        Self::storage(err)
    }
}

#[async_trait]
impl<C> TaskStore for PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    #[instrument(skip(self))]
    async fn get(&self, id: TaskId) -> TaskStoreResult<Task> {
        let row = self
            .run_blocking(move |connection| {
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::deleted_at.is_null())
                    .select(TaskRow::as_select())
                    .first::<TaskRow>(connection)
                    .optional()
                    .map_err(TaskStoreError::from)
            })
            .await?;
        let task = row.map(row_to_task).transpose()?;
        debug!(found = task.is_some(), "looked up task");
        task.ok_or(TaskStoreError::NotFound(id))
    }

    async fn get_all(&self) -> TaskStoreResult<Vec<Task>> {
        self.load_visible(None, None).await
    }

    async fn get_all_by_owner(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        self.load_visible(Some(owner), None).await
    }

    async fn get_by_status(&self, status: TaskStatus) -> TaskStoreResult<Vec<Task>> {
        self.load_visible(None, Some(status)).await
    }

    async fn get_by_status_and_owner(
        &self,
        status: TaskStatus,
        owner: &OwnerId,
    ) -> TaskStoreResult<Vec<Task>> {
        self.load_visible(Some(owner), Some(status)).await
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> TaskStoreResult<Vec<Task>> {
        self.search_visible(query, None).await
    }

    #[instrument(skip(self))]
    async fn search_by_owner(
        &self,
        query: &str,
        owner: &OwnerId,
    ) -> TaskStoreResult<Vec<Task>> {
        self.search_visible(query, Some(owner)).await
    }

    #[instrument(skip(self, task), fields(task_id = %task.id()))]
    async fn save(&self, task: &mut Task) -> TaskStoreResult<()> {
        task.validate()?;

        let mut candidate = task.clone();
        candidate.touch(&*self.clock);
        let row = to_row(&candidate);
        let id = candidate.id();

        let affected = self
            .run_blocking(move |connection| {
                diesel::sql_query(UPSERT_SQL)
                    .bind::<SqlUuid, _>(row.id)
                    .bind::<Text, _>(row.title)
                    .bind::<Nullable<Text>, _>(row.description)
                    .bind::<Varchar, _>(row.status)
                    .bind::<Text, _>(row.owner_id)
                    .bind::<Nullable<SqlUuid>, _>(row.project_id)
                    .bind::<Nullable<SqlUuid>, _>(row.parent_id)
                    .bind::<Jsonb, _>(row.contexts)
                    .bind::<Jsonb, _>(row.tags)
                    .bind::<Nullable<Timestamptz>, _>(row.due_date)
                    .bind::<Nullable<Timestamptz>, _>(row.scheduled_date)
                    .bind::<Nullable<BigInt>, _>(row.time_estimate)
                    .bind::<Nullable<Varchar>, _>(row.energy_required)
                    .bind::<Nullable<SmallInt>, _>(row.priority)
                    .bind::<Nullable<Varchar>, _>(row.timeframe)
                    .bind::<Bool, _>(row.is_recurring)
                    .bind::<Nullable<Text>, _>(row.recurring_rule)
                    .bind::<Timestamptz, _>(row.created_at)
                    .bind::<Timestamptz, _>(row.updated_at)
                    .bind::<Nullable<Timestamptz>, _>(row.completed_at)
                    .bind::<Nullable<Timestamptz>, _>(row.deleted_at)
                    .execute(connection)
                    .map_err(TaskStoreError::from)
            })
            .await?;

        if affected == 0 {
            debug!("refused to overwrite soft-deleted task");
            return Err(TaskStoreError::NotFound(id));
        }

        *task = candidate;
        info!(owner = %task.owner_id(), status = %task.status(), "saved task");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let clock = Arc::clone(&self.clock);
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx| {
                let row = tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::deleted_at.is_null())
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskStoreError::NotFound(id))?;

                let mut task = row_to_task(row)?;
                task.delete(&*clock);

                diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                    .set((
                        tasks::deleted_at.eq(task.deleted_at()),
                        tasks::updated_at.eq(task.updated_at()),
                    ))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await?;

        info!("soft-deleted task");
        Ok(())
    }
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        owner_id: task.owner_id().as_str().to_owned(),
        project_id: task.project_id().map(TaskId::into_inner),
        parent_id: task.parent_id().map(TaskId::into_inner),
        contexts: Value::from(task.contexts().to_vec()),
        tags: Value::from(task.tags().to_vec()),
        due_date: task.due_date(),
        scheduled_date: task.scheduled_date(),
        time_estimate: task.time_estimate().map(i64::from),
        energy_required: task.energy_required().map(|level| level.as_str().to_owned()),
        priority: task.priority().map(i16::from),
        timeframe: task.timeframe().map(|frame| frame.as_str().to_owned()),
        is_recurring: task.is_recurring(),
        recurring_rule: task.recurring_rule().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        completed_at: task.completed_at(),
        deleted_at: task.deleted_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        owner_id,
        project_id,
        parent_id,
        contexts,
        tags,
        due_date,
        scheduled_date,
        time_estimate,
        energy_required,
        priority,
        timeframe,
        is_recurring,
        recurring_rule,
        created_at,
        updated_at,
        completed_at,
        deleted_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskStoreError::storage)?,
        owner_id: OwnerId::new(owner_id).map_err(TaskStoreError::storage)?,
        project_id: project_id.map(TaskId::from_uuid),
        parent_id: parent_id.map(TaskId::from_uuid),
        contexts: serde_json::from_value(contexts).map_err(TaskStoreError::storage)?,
        tags: serde_json::from_value(tags).map_err(TaskStoreError::storage)?,
        due_date,
        scheduled_date,
        time_estimate: time_estimate
            .map(u32::try_from)
            .transpose()
            .map_err(TaskStoreError::storage)?,
        energy_required: energy_required
            .as_deref()
            .map(EnergyLevel::try_from)
            .transpose()
            .map_err(TaskStoreError::storage)?,
        priority: priority
            .map(u8::try_from)
            .transpose()
            .map_err(TaskStoreError::storage)?,
        timeframe: timeframe
            .as_deref()
            .map(Timeframe::try_from)
            .transpose()
            .map_err(TaskStoreError::storage)?,
        is_recurring,
        recurring_rule,
        created_at,
        updated_at,
        completed_at,
        deleted_at,
    };
    Ok(Task::from_persisted(data))
}
