//! Diesel row model for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// One `tasks` row, used both for reads and for the upsert binds.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub project_id: Option<uuid::Uuid>,
    pub parent_id: Option<uuid::Uuid>,
    /// JSON array of context labels.
    pub contexts: Value,
    /// JSON array of tag labels.
    pub tags: Value,
    pub due_date: Option<DateTime<Utc>>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub time_estimate: Option<i64>,
    pub energy_required: Option<String>,
    pub priority: Option<i16>,
    pub timeframe: Option<String>,
    pub is_recurring: bool,
    pub recurring_rule: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}
