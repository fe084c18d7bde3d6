//! Application services for GTD workflows.

mod workflow;

pub use workflow::{
    CaptureTaskRequest, StatusSummary, TaskTransition, TaskUpdate, TaskWorkflowError,
    TaskWorkflowResult, TaskWorkflowService,
};
