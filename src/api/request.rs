//! Request and response bodies specific to the HTTP API.
//!
//! Service inputs that map one-to-one onto a JSON body are accepted as they
//! are; the types here cover query strings, path-plus-body combinations and
//! small acknowledgement payloads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AppraisalCycleStatus, DocumentType, LeaveRequestStatus, ReviewStatus, WorkflowStatus,
};
use crate::services::{NewDocument, OffboardingRequest};

/// Body of `POST /employees/onboarding/complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRequest {
    /// The employee finishing onboarding.
    pub employee_id: i64,
}

/// Body of `POST /employees/offboarding/initiate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffboardingBody {
    /// The departing employee.
    pub employee_id: i64,
    /// Date a resignation was tendered.
    #[serde(default)]
    pub resignation_date: Option<NaiveDate>,
    /// Date employment was terminated.
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
    /// Final working day.
    #[serde(default)]
    pub last_working_day: Option<NaiveDate>,
}

impl From<&OffboardingBody> for OffboardingRequest {
    fn from(body: &OffboardingBody) -> Self {
        OffboardingRequest {
            resignation_date: body.resignation_date,
            termination_date: body.termination_date,
            last_working_day: body.last_working_day,
        }
    }
}

/// JSON `metadata` part of a document upload; the `file` part carries the
/// bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentMetadata {
    /// Document category.
    pub document_type: DocumentType,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Overrides the file name sent with the `file` part.
    #[serde(default)]
    pub file_name: Option<String>,
}

impl DocumentMetadata {
    /// Combines the metadata with the uploaded part's file name.
    pub fn into_new_document(self, uploaded_name: Option<String>) -> NewDocument {
        NewDocument {
            document_type: self.document_type,
            file_name: self.file_name.or(uploaded_name).unwrap_or_default(),
            description: self.description,
        }
    }
}

/// `?year=` filter; the current year when absent.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct YearQuery {
    /// Calendar year.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Holiday listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayQuery {
    /// Calendar year; the current year when absent.
    #[serde(default)]
    pub year: Option<i32>,
    /// Country; the organisation's when absent.
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Parameters of the leave-day calculator.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveDaysQuery {
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Count Saturdays and Sundays.
    #[serde(default)]
    pub include_weekends: bool,
    /// Holiday calendar to apply.
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Parameters of a balance check.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceCheckQuery {
    /// Leave category.
    pub leave_type_id: i64,
    /// Days requested.
    pub days: Decimal,
    /// Balance year; the current year when absent.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Result of a balance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceCheckResponse {
    /// Whether the requested days are available.
    pub sufficient: bool,
}

/// Body of a monthly accrual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualRequest {
    /// Employee credited.
    pub employee_id: i64,
    /// Leave category.
    pub leave_type_id: i64,
    /// Days to add.
    pub days: Decimal,
    /// Balance year.
    pub year: i32,
}

/// Body of a manual balance adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    /// Balance year.
    pub year: i32,
    /// New allocation.
    #[serde(default)]
    pub allocated_days: Option<Decimal>,
    /// New taken days.
    #[serde(default)]
    pub taken_days: Option<Decimal>,
}

/// `?status=` filter for leave requests.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LeaveStatusQuery {
    /// Only requests in this status.
    #[serde(default)]
    pub status: Option<LeaveRequestStatus>,
}

/// Body of a cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelLeaveRequest {
    /// The employee who applied.
    pub employee_id: i64,
}

/// `?effective_on=` filter for salary structures.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StructureQuery {
    /// Only rows in effect on this date.
    #[serde(default)]
    pub effective_on: Option<NaiveDate>,
}

/// Body of a manual workflow assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignWorkflowRequest {
    /// Assignee.
    pub employee_id: i64,
    /// Template to instantiate.
    pub template_id: i64,
    /// Optional due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// `?status=` filter for employee workflows.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WorkflowStatusQuery {
    /// Only workflows in this status.
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
}

/// `?cycle_id=` filter for goals.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GoalQuery {
    /// Only goals of this cycle.
    #[serde(default)]
    pub cycle_id: Option<i64>,
}

/// `?status=` filter for appraisal cycles.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CycleStatusQuery {
    /// Only cycles in this status.
    #[serde(default)]
    pub status: Option<AppraisalCycleStatus>,
}

/// Body of a review initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateReviewsRequest {
    /// Employees to review.
    pub employee_ids: Vec<i64>,
}

/// `?manager_id=` filter for reviews.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReviewQuery {
    /// Only reviews held by this manager.
    #[serde(default)]
    pub manager_id: Option<i64>,
}

/// Body of a manual review status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStatusRequest {
    /// Target status.
    pub status: ReviewStatus,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offboarding_body_defaults() {
        let body: OffboardingBody = serde_json::from_str(r#"{"employee_id": 4}"#).unwrap();
        let request = OffboardingRequest::from(&body);
        assert_eq!(body.employee_id, 4);
        assert!(request.resignation_date.is_none());
        assert!(request.termination_date.is_none());
    }

    #[test]
    fn test_balance_adjustment_fields_are_optional() {
        let body: BalanceAdjustment =
            serde_json::from_str(r#"{"year": 2026, "taken_days": "3"}"#).unwrap();
        assert!(body.allocated_days.is_none());
        assert_eq!(body.taken_days, Some(Decimal::from(3)));
    }
}
