//! Goals, appraisal cycles and performance reviews.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

string_enum! {
    /// Progress of a goal.
    pub enum GoalStatus {
        /// Not started.
        NotStarted => "not_started",
        /// Being worked on.
        InProgress => "in_progress",
        /// Achieved.
        Completed => "completed",
        /// Paused.
        OnHold => "on_hold",
        /// Dropped.
        Cancelled => "cancelled",
    }
}

impl Default for GoalStatus {
    fn default() -> Self {
        GoalStatus::NotStarted
    }
}

string_enum! {
    /// Lifecycle of an appraisal cycle.
    pub enum AppraisalCycleStatus {
        /// Being set up.
        Draft => "draft",
        /// Open; reviews may be initiated.
        Active => "active",
        /// Collecting feedback.
        FeedbackCollection => "feedback_collection",
        /// Review meetings under way.
        ReviewMeeting => "review_meeting",
        /// Finished.
        Closed => "closed",
        /// Kept for history only.
        Archived => "archived",
    }
}

impl AppraisalCycleStatus {
    /// Returns true if goals may still be attached to the cycle.
    pub fn accepts_goals(&self) -> bool {
        matches!(
            self,
            AppraisalCycleStatus::Draft | AppraisalCycleStatus::Active
        )
    }
}

string_enum! {
    /// Lifecycle of a performance review.
    pub enum ReviewStatus {
        /// Waiting for the employee's self evaluation.
        PendingSelfEvaluation => "pending_self_evaluation",
        /// Waiting for the manager's feedback.
        PendingManagerFeedback => "pending_manager_feedback",
        /// Both parts submitted; discussion outstanding.
        PendingDiscussion => "pending_discussion",
        /// Closed.
        Completed => "completed",
    }
}

impl Default for ReviewStatus {
    fn default() -> Self {
        ReviewStatus::PendingSelfEvaluation
    }
}

impl ReviewStatus {
    /// Returns true if a review may move from `self` to `next`.
    ///
    /// The flow is strictly linear.
    ///
    /// ```
    /// use hr_engine::models::ReviewStatus;
    ///
    /// assert!(ReviewStatus::PendingDiscussion.can_transition_to(ReviewStatus::Completed));
    /// assert!(!ReviewStatus::PendingSelfEvaluation.can_transition_to(ReviewStatus::Completed));
    /// ```
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        use ReviewStatus::*;
        matches!(
            (self, next),
            (PendingSelfEvaluation, PendingManagerFeedback)
                | (PendingManagerFeedback, PendingDiscussion)
                | (PendingDiscussion, Completed)
        )
    }

    /// Returns true if `next` may be set directly rather than through a
    /// submission.
    ///
    /// Only closing a discussed review qualifies.
    pub fn can_be_set_manually(&self, next: ReviewStatus) -> bool {
        matches!(
            (self, next),
            (ReviewStatus::PendingDiscussion, ReviewStatus::Completed)
        )
    }
}

/// An objective set for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Surrogate key.
    pub id: i64,
    /// Owning employee.
    pub employee_id: i64,
    /// Optional cycle the goal is assessed in.
    pub appraisal_cycle_id: Option<i64>,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// How success is measured.
    pub key_performance_indicator: Option<String>,
    /// Target for the indicator.
    pub target_value: Option<String>,
    /// Planned start.
    pub start_date: Option<NaiveDate>,
    /// Planned end.
    pub due_date: Option<NaiveDate>,
    /// Progress.
    pub status: GoalStatus,
    /// Relative weight, 0 to 100.
    pub weightage: Option<Decimal>,
}

/// A period in which reviews take place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppraisalCycle {
    /// Surrogate key.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// First day of the cycle.
    pub start_date: NaiveDate,
    /// Last day of the cycle.
    pub end_date: NaiveDate,
    /// Feedback window opening.
    pub feedback_start_date: Option<NaiveDate>,
    /// Feedback window closing.
    pub feedback_end_date: Option<NaiveDate>,
    /// Current status.
    pub status: AppraisalCycleStatus,
    /// Free-form description.
    pub description: Option<String>,
}

/// A review of one employee by their manager in one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReview {
    /// Surrogate key.
    pub id: i64,
    /// Cycle the review belongs to.
    pub appraisal_cycle_id: i64,
    /// Employee reviewed.
    pub employee_id: i64,
    /// Reviewing manager, an employee id.
    pub manager_id: i64,
    /// Employee's own assessment.
    pub self_evaluation_text: Option<String>,
    /// Employee's own rating, 1 to 5.
    pub self_evaluation_rating: Option<Decimal>,
    /// When the self evaluation was submitted.
    pub self_evaluation_submitted_on: Option<DateTime<Utc>>,
    /// Manager's assessment.
    pub manager_feedback_text: Option<String>,
    /// Manager's rating, 1 to 5.
    pub manager_rating: Option<Decimal>,
    /// When the manager feedback was submitted.
    pub manager_feedback_submitted_on: Option<DateTime<Utc>>,
    /// Current status.
    pub review_status: ReviewStatus,
}
