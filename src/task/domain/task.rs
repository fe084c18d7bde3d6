//! Task aggregate root and GTD transition rules.

use super::{EnergyLevel, OwnerId, TaskDomainError, TaskId, TaskStatus, Timeframe};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Number of sub-second digits kept on every timestamp.
///
/// `PostgreSQL` stores microseconds; truncating in the domain keeps both
/// store backends returning identical values.
const TIMESTAMP_SUBSEC_DIGITS: u16 = 6;

/// Task aggregate root. A project is a task whose status is
/// [`TaskStatus::Project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    owner_id: OwnerId,
    project_id: Option<TaskId>,
    parent_id: Option<TaskId>,
    contexts: Vec<String>,
    tags: Vec<String>,
    due_date: Option<DateTime<Utc>>,
    scheduled_date: Option<DateTime<Utc>>,
    time_estimate: Option<u32>,
    energy_required: Option<EnergyLevel>,
    priority: Option<u8>,
    timeframe: Option<Timeframe>,
    is_recurring: bool,
    recurring_rule: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted owner.
    pub owner_id: OwnerId,
    /// Containing project, if any.
    pub project_id: Option<TaskId>,
    /// Parent task, if any.
    pub parent_id: Option<TaskId>,
    /// Context labels.
    pub contexts: Vec<String>,
    /// Tag labels.
    pub tags: Vec<String>,
    /// Due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Scheduled date, if any.
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Estimated minutes.
    pub time_estimate: Option<u32>,
    /// Energy required.
    pub energy_required: Option<EnergyLevel>,
    /// Priority level.
    pub priority: Option<u8>,
    /// Timeframe.
    pub timeframe: Option<Timeframe>,
    /// Recurrence flag.
    pub is_recurring: bool,
    /// Recurrence rule text.
    pub recurring_rule: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp, if ever completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete timestamp, if deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new inbox task.
    ///
    /// The title is not checked here; [`Task::validate`] rejects a blank
    /// title when the task is saved.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        owner_id: OwnerId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = now(clock);
        Self {
            id: TaskId::new(),
            title: title.into(),
            description,
            status: TaskStatus::Inbox,
            owner_id,
            project_id: None,
            parent_id: None,
            contexts: Vec::new(),
            tags: Vec::new(),
            due_date: None,
            scheduled_date: None,
            time_estimate: None,
            energy_required: None,
            priority: None,
            timeframe: None,
            is_recurring: false,
            recurring_rule: None,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
            deleted_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            owner_id: data.owner_id,
            project_id: data.project_id,
            parent_id: data.parent_id,
            contexts: data.contexts,
            tags: data.tags,
            due_date: data.due_date,
            scheduled_date: data.scheduled_date,
            time_estimate: data.time_estimate,
            energy_required: data.energy_required,
            priority: data.priority,
            timeframe: data.timeframe,
            is_recurring: data.is_recurring,
            recurring_rule: data.recurring_rule,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Checks the invariants every stored task must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTitle`] when the title is blank,
    /// or [`TaskDomainError::NulCharacter`] when any text field contains
    /// `\0`.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.title.trim().is_empty() {
            return Err(TaskDomainError::InvalidTitle);
        }
        let text_fields = [
            ("title", Some(self.title.as_str())),
            ("description", self.description.as_deref()),
            ("owner", Some(self.owner_id.as_str())),
            ("recurring rule", self.recurring_rule.as_deref()),
        ];
        for (field, value) in text_fields {
            if value.is_some_and(has_nul) {
                return Err(TaskDomainError::NulCharacter(field));
            }
        }
        if self.contexts.iter().any(|label| has_nul(label)) {
            return Err(TaskDomainError::NulCharacter("context"));
        }
        if self.tags.iter().any(|label| has_nul(label)) {
            return Err(TaskDomainError::NulCharacter("tag"));
        }
        Ok(())
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the owner.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Returns the containing project, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<TaskId> {
        self.project_id
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns the context labels.
    #[must_use]
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Returns the tag labels.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the scheduled date, if any.
    #[must_use]
    pub const fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        self.scheduled_date
    }

    /// Returns the estimate in minutes, if any.
    #[must_use]
    pub const fn time_estimate(&self) -> Option<u32> {
        self.time_estimate
    }

    /// Returns the energy required, if set.
    #[must_use]
    pub const fn energy_required(&self) -> Option<EnergyLevel> {
        self.energy_required
    }

    /// Returns the priority, if set.
    #[must_use]
    pub const fn priority(&self) -> Option<u8> {
        self.priority
    }

    /// Returns the timeframe, if set.
    #[must_use]
    pub const fn timeframe(&self) -> Option<Timeframe> {
        self.timeframe
    }

    /// Returns whether the task recurs.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.is_recurring
    }

    /// Returns the recurrence rule text, if any.
    #[must_use]
    pub fn recurring_rule(&self) -> Option<&str> {
        self.recurring_rule.as_deref()
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

    /// Returns when the task was first marked done, if ever.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the soft-delete timestamp, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` once the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns `true` when the task is a project.
    #[must_use]
    pub fn is_project(&self) -> bool {
        self.status == TaskStatus::Project
    }

    /// Moves the task to the next-actions list.
    pub fn mark_as_next(&mut self, clock: &impl Clock) {
        self.set_status(TaskStatus::Next, clock);
    }

    /// Marks the task as waiting on someone else.
    pub fn mark_as_waiting(&mut self, clock: &impl Clock) {
        self.set_status(TaskStatus::Waiting, clock);
    }

    /// Moves the task to the someday/maybe list.
    pub fn mark_as_someday(&mut self, clock: &impl Clock) {
        self.set_status(TaskStatus::Someday, clock);
    }

    /// Converts the task into a project.
    pub fn mark_as_project(&mut self, clock: &impl Clock) {
        self.set_status(TaskStatus::Project, clock);
    }

    /// Marks the task as done and stamps `completed_at`.
    ///
    /// `completed_at` is left in place if the task later moves to another
    /// status.
    pub fn mark_as_done(&mut self, clock: &impl Clock) {
        self.status = TaskStatus::Done;
        let timestamp = self.touch(clock);
        self.completed_at = Some(timestamp);
    }

    /// Schedules the task for the given date.
    pub fn mark_as_scheduled(&mut self, date: DateTime<Utc>, clock: &impl Clock) {
        self.scheduled_date = Some(to_storage_precision(date));
        self.set_status(TaskStatus::Scheduled, clock);
    }

    /// Soft-deletes the task. The status is left unchanged.
    pub fn delete(&mut self, clock: &impl Clock) {
        let timestamp = self.touch(clock);
        self.deleted_at = Some(timestamp);
    }

    /// Refreshes `updated_at` and returns the new value.
    ///
    /// The timestamp never moves backwards, even if the clock does.
    pub fn touch(&mut self, clock: &impl Clock) -> DateTime<Utc> {
        self.updated_at = now(clock).max(self.updated_at);
        self.updated_at
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Places the task in a project, or removes it from one with `None`.
    pub const fn set_project(&mut self, project_id: Option<TaskId>) {
        self.project_id = project_id;
    }

    /// Sets the parent task.
    pub const fn set_parent(&mut self, parent_id: Option<TaskId>) {
        self.parent_id = parent_id;
    }

    /// Replaces the context labels.
    pub fn set_contexts(&mut self, contexts: impl IntoIterator<Item = String>) {
        self.contexts = contexts.into_iter().collect();
    }

    /// Adds a context label.
    pub fn add_context(&mut self, context: impl Into<String>) {
        self.contexts.push(context.into());
    }

    /// Replaces the tag labels.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        self.tags = tags.into_iter().collect();
    }

    /// Adds a tag label.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Sets or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date.map(to_storage_precision);
    }

    /// Sets or clears the estimate in minutes.
    pub const fn set_time_estimate(&mut self, minutes: Option<u32>) {
        self.time_estimate = minutes;
    }

    /// Sets or clears the energy required.
    pub const fn set_energy_required(&mut self, energy: Option<EnergyLevel>) {
        self.energy_required = energy;
    }

    /// Sets or clears the priority.
    pub const fn set_priority(&mut self, priority: Option<u8>) {
        self.priority = priority;
    }

    /// Sets or clears the timeframe.
    pub const fn set_timeframe(&mut self, timeframe: Option<Timeframe>) {
        self.timeframe = timeframe;
    }

    /// Sets the recurrence descriptor. The rule is stored verbatim.
    pub fn set_recurrence(&mut self, is_recurring: bool, rule: Option<String>) {
        self.is_recurring = is_recurring;
        self.recurring_rule = rule;
    }

    fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }
}

fn now(clock: &impl Clock) -> DateTime<Utc> {
    to_storage_precision(clock.utc())
}

fn to_storage_precision(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS)
}

fn has_nul(text: &str) -> bool {
    text.contains('\0')
}
