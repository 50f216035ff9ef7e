//! Leave types, balances, requests and the holiday calendar.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

string_enum! {
    /// The closed set of leave categories.
    pub enum LeaveTypeName {
        /// Annual / earned leave.
        Annual => "annual",
        /// Sick leave.
        Sick => "sick",
        /// Casual leave.
        Casual => "casual",
        /// Leave without pay.
        Unpaid => "unpaid",
        /// Maternity leave.
        Maternity => "maternity",
        /// Paternity leave.
        Paternity => "paternity",
        /// Anything else.
        Other => "other",
    }
}

string_enum! {
    /// Lifecycle of a leave request. Only `Pending` can be actioned or cancelled.
    pub enum LeaveRequestStatus {
        /// Awaiting a manager decision.
        Pending => "pending",
        /// Approved; days counted against the balance when paid.
        Approved => "approved",
        /// Declined.
        Rejected => "rejected",
        /// Withdrawn by the employee.
        Cancelled => "cancelled",
    }
}

/// A configured category of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Surrogate key.
    pub id: i64,
    /// Unique category name.
    pub name: LeaveTypeName,
    /// Free-form description.
    pub description: Option<String>,
    /// Allocation granted when a yearly balance row is created.
    pub default_days_annually: Decimal,
    /// Paid leave draws down a balance; unpaid leave triggers loss of pay.
    pub is_paid: bool,
    /// Requests start `Pending` when true, otherwise `Approved`.
    pub requires_approval: bool,
}

/// Allocation and usage of one leave type for one employee and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Surrogate key.
    pub id: i64,
    /// Owning employee.
    pub employee_id: i64,
    /// Leave category.
    pub leave_type_id: i64,
    /// Calendar year.
    pub year: i32,
    /// Days granted.
    pub allocated_days: Decimal,
    /// Days used, never negative.
    pub taken_days: Decimal,
}

impl LeaveBalance {
    /// Remaining days: `allocated - taken`.
    ///
    /// ```
    /// use hr_engine::models::LeaveBalance;
    /// use rust_decimal::Decimal;
    ///
    /// let balance = LeaveBalance {
    ///     id: 1,
    ///     employee_id: 1,
    ///     leave_type_id: 1,
    ///     year: 2026,
    ///     allocated_days: Decimal::from(20),
    ///     taken_days: Decimal::from(5),
    /// };
    /// assert_eq!(balance.balance_days(), Decimal::from(15));
    /// ```
    pub fn balance_days(&self) -> Decimal {
        self.allocated_days - self.taken_days
    }
}

/// An employee's request for time off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Surrogate key.
    pub id: i64,
    /// Requesting employee.
    pub employee_id: i64,
    /// Leave category.
    pub leave_type_id: i64,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Employee's reason.
    pub reason: Option<String>,
    /// Current status.
    pub status: LeaveRequestStatus,
    /// Working days requested, always positive.
    pub number_of_days: Decimal,
    /// When the request was submitted.
    pub applied_on: DateTime<Utc>,
    /// Remarks recorded by whoever actioned the request.
    pub manager_remarks: Option<String>,
    /// The user who approved or rejected the request.
    pub actioned_by_user_id: Option<i64>,
    /// When the request was approved or rejected.
    pub actioned_on: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Returns true if the request is still awaiting a decision.
    pub fn is_pending(&self) -> bool {
        self.status == LeaveRequestStatus::Pending
    }
}

/// A public holiday excluded from leave day counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Surrogate key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// The date of the holiday.
    pub date: NaiveDate,
    /// Optional (restricted) holidays are still excluded from counts.
    pub is_optional: bool,
    /// ISO country code the holiday applies to.
    pub country_code: String,
}
