//! Derivation of a workflow's status from its steps.

use crate::models::{StepStatus, WorkflowStatus};

/// A step as seen by the roll-up: its status and whether it is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepState {
    /// Current status of the step.
    pub status: StepStatus,
    /// Whether the step gates completion.
    pub is_mandatory: bool,
}

/// Recomputes a workflow's status after one of its steps changed.
///
/// * A `Completed` workflow never changes.
/// * Every mandatory step `Completed` makes the workflow `Completed`
///   (vacuously so when nothing is mandatory).
/// * Otherwise a `Pending` workflow with any step out of `Pending` becomes
///   `InProgress`.
/// * Otherwise the status is unchanged.
///
/// # Examples
///
/// ```
/// use hr_engine::calculation::{roll_up_workflow_status, StepState};
/// use hr_engine::models::{StepStatus, WorkflowStatus};
///
/// let steps = [
///     StepState { status: StepStatus::Completed, is_mandatory: true },
///     StepState { status: StepStatus::Pending, is_mandatory: false },
/// ];
/// assert_eq!(
///     roll_up_workflow_status(WorkflowStatus::Pending, &steps),
///     WorkflowStatus::Completed
/// );
/// ```
pub fn roll_up_workflow_status(current: WorkflowStatus, steps: &[StepState]) -> WorkflowStatus {
    if current == WorkflowStatus::Completed {
        return current;
    }

    let mandatory_done = steps
        .iter()
        .filter(|s| s.is_mandatory)
        .all(|s| s.status == StepStatus::Completed);
    if mandatory_done {
        return WorkflowStatus::Completed;
    }

    if current == WorkflowStatus::Pending && steps.iter().any(|s| s.status != StepStatus::Pending) {
        return WorkflowStatus::InProgress;
    }

    current
}
