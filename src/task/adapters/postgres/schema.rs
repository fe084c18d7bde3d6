//! Diesel schema for task persistence.

diesel::table! {
    /// GTD task and project records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        title -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// GTD status.
        #[max_length = 20]
        status -> Varchar,
        /// Owning user identifier.
        owner_id -> Text,
        /// Containing project.
        project_id -> Nullable<Uuid>,
        /// Parent task.
        parent_id -> Nullable<Uuid>,
        /// Context labels as a JSON string array.
        contexts -> Jsonb,
        /// Tag labels as a JSON string array.
        tags -> Jsonb,
        /// Due date.
        due_date -> Nullable<Timestamptz>,
        /// Scheduled date.
        scheduled_date -> Nullable<Timestamptz>,
        /// Estimated minutes.
        time_estimate -> Nullable<Int8>,
        /// Energy level.
        #[max_length = 20]
        energy_required -> Nullable<Varchar>,
        /// Priority level.
        priority -> Nullable<Int2>,
        /// Timeframe.
        #[max_length = 20]
        timeframe -> Nullable<Varchar>,
        /// Recurrence flag.
        is_recurring -> Bool,
        /// Recurrence rule text.
        recurring_rule -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Soft-delete timestamp.
        deleted_at -> Nullable<Timestamptz>,
    }
}
