//! Workflow templates and their per-employee instances.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::EmploymentStatus;

string_enum! {
    /// The purpose of a workflow template.
    pub enum WorkflowType {
        /// Joining checklist.
        Onboarding => "onboarding",
        /// Exit checklist.
        Offboarding => "offboarding",
        /// Anything else.
        Other => "other",
    }
}

string_enum! {
    /// Lifecycle of an assigned workflow.
    pub enum WorkflowStatus {
        /// No step has been touched yet.
        Pending => "pending",
        /// At least one step has moved.
        InProgress => "in_progress",
        /// Every mandatory step is completed.
        Completed => "completed",
        /// Abandoned.
        Cancelled => "cancelled",
    }
}

impl WorkflowStatus {
    /// Returns true while the workflow still blocks a re-assignment of its template.
    pub fn is_open(&self) -> bool {
        matches!(self, WorkflowStatus::Pending | WorkflowStatus::InProgress)
    }
}

string_enum! {
    /// Status of one step within an assigned workflow.
    pub enum StepStatus {
        /// Not yet done.
        Pending => "pending",
        /// Done.
        Completed => "completed",
        /// Deliberately not done.
        Skipped => "skipped",
    }
}

/// A reusable checklist definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    /// Surrogate key.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Purpose of the template.
    pub workflow_type: WorkflowType,
    /// Inactive templates are never auto-assigned.
    pub is_active: bool,
    /// Employment status that triggers automatic assignment.
    pub auto_assign_on_status: Option<EmploymentStatus>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One step of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStepTemplate {
    /// Surrogate key.
    pub id: i64,
    /// Owning template.
    pub template_id: i64,
    /// Step name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Position within the template.
    pub order: u32,
    /// Whether the step gates completion of the workflow.
    pub is_mandatory: bool,
}

/// A template assigned to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeWorkflow {
    /// Surrogate key.
    pub id: i64,
    /// The employee the workflow is for.
    pub employee_id: i64,
    /// The template instantiated.
    pub template_id: i64,
    /// Assignment timestamp.
    pub assigned_on: DateTime<Utc>,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Rolled-up status.
    pub status: WorkflowStatus,
}

/// A step instance within an assigned workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeWorkflowStep {
    /// Surrogate key.
    pub id: i64,
    /// Owning workflow instance.
    pub employee_workflow_id: i64,
    /// The template step this instance was created from.
    pub step_template_id: i64,
    /// Current status.
    pub status: StepStatus,
    /// Set only while the status is `Completed`.
    pub completed_on: Option<DateTime<Utc>>,
    /// Set only while the status is `Completed`.
    pub completed_by_user_id: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_and_in_progress_are_open() {
        assert!(WorkflowStatus::Pending.is_open());
        assert!(WorkflowStatus::InProgress.is_open());
        assert!(!WorkflowStatus::Completed.is_open());
        assert!(!WorkflowStatus::Cancelled.is_open());
    }

    #[test]
    fn test_step_status_round_trips_through_str() {
        for status in StepStatus::ALL {
            let parsed: StepStatus = status.as_str().parse().unwrap();
            assert_eq!(&parsed, status);
        }
    }
}
