//! Salary components, structures, payroll runs and payslips.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

string_enum! {
    /// How a salary component contributes to a payslip.
    pub enum SalaryComponentType {
        /// Recurring earning, part of the basic/fixed pay.
        EarningFixed => "earning_fixed",
        /// Variable earning (bonus, incentive).
        EarningVariable => "earning_variable",
        /// Recurring deduction.
        DeductionFixed => "deduction_fixed",
        /// Variable deduction; loss of pay is reported with this type.
        DeductionVariable => "deduction_variable",
        /// Statutory deduction; provident fund is reported with this type.
        StatutoryDeduction => "statutory_deduction",
    }
}

impl SalaryComponentType {
    /// Returns true for earning component types.
    pub fn is_earning(&self) -> bool {
        matches!(
            self,
            SalaryComponentType::EarningFixed | SalaryComponentType::EarningVariable
        )
    }
}

string_enum! {
    /// Lifecycle of a monthly payroll run.
    pub enum PayrollRunStatus {
        /// Created or reopened; may be processed.
        Draft => "draft",
        /// Payslips generated, awaiting sign-off.
        PendingApproval => "pending_approval",
        /// Signed off; bank advice may be exported.
        Approved => "approved",
        /// Sent to the bank.
        Processed => "processed",
        /// Salaries credited.
        Paid => "paid",
        /// Sent back; may be reprocessed.
        Rejected => "rejected",
    }
}

impl PayrollRunStatus {
    /// Returns true if payslips may be (re)generated from this status.
    pub fn is_processable(&self) -> bool {
        matches!(self, PayrollRunStatus::Draft | PayrollRunStatus::Rejected)
    }

    /// Returns true if a bank advice may be exported from this status.
    pub fn allows_bank_advice(&self) -> bool {
        matches!(
            self,
            PayrollRunStatus::Approved | PayrollRunStatus::Processed | PayrollRunStatus::Paid
        )
    }

    /// Returns true if a run may move from `self` to `next`.
    ///
    /// ```
    /// use hr_engine::models::PayrollRunStatus;
    ///
    /// assert!(PayrollRunStatus::PendingApproval.can_transition_to(PayrollRunStatus::Approved));
    /// assert!(!PayrollRunStatus::Paid.can_transition_to(PayrollRunStatus::Draft));
    /// ```
    pub fn can_transition_to(&self, next: PayrollRunStatus) -> bool {
        use PayrollRunStatus::*;
        matches!(
            (self, next),
            (Draft, PendingApproval)
                | (PendingApproval, Approved)
                | (PendingApproval, Rejected)
                | (Approved, Processed)
                | (Approved, Paid)
                | (Approved, Rejected)
                | (Processed, Paid)
                | (Rejected, Draft)
        )
    }
}

/// A named pay element (e.g. "Basic Salary", "HRA").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Surrogate key.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// How the component contributes to pay.
    pub component_type: SalaryComponentType,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the component is taxable income.
    pub is_taxable: bool,
    /// Informational formula text; never evaluated.
    pub calculation_formula: Option<String>,
}

/// One component amount for one employee over an effective date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Surrogate key.
    pub id: i64,
    /// Owning employee.
    pub employee_id: i64,
    /// The component this amount is for.
    pub component_id: i64,
    /// Monthly amount.
    pub amount: Decimal,
    /// First date the row applies.
    pub effective_from: NaiveDate,
    /// Last date the row applies; open-ended when `None`.
    pub effective_to: Option<NaiveDate>,
}

impl SalaryStructure {
    /// Returns true if the row applies on `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}

/// A monthly payroll batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Surrogate key.
    pub id: i64,
    /// Payroll month, 1 to 12.
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Current status.
    pub status: PayrollRunStatus,
    /// When the run was created or last restarted.
    pub run_date: DateTime<Utc>,
    /// The user who started the run.
    pub processed_by_user_id: Option<i64>,
    /// Outcome of the last processing pass.
    pub notes: Option<String>,
}

/// One earning or deduction line on a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLine {
    /// Component or engine rule name.
    pub name: String,
    /// Line amount.
    pub amount: Decimal,
    /// Component type the line is reported as.
    #[serde(rename = "type")]
    pub component_type: SalaryComponentType,
    /// Unpaid leave days behind a loss-of-pay line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpaid_days: Option<Decimal>,
}

/// Earnings and deductions breakdown of a payslip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDetails {
    /// Earning lines, in the order they were applied.
    pub earnings: Vec<PayslipLine>,
    /// Deduction lines, in the order they were applied.
    pub deductions: Vec<PayslipLine>,
}

/// The calculated pay of one employee for one payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Surrogate key.
    pub id: i64,
    /// The employee paid.
    pub employee_id: i64,
    /// The run that generated the payslip.
    pub payroll_run_id: i64,
    /// Sum of earning lines.
    pub gross_earnings: Decimal,
    /// Sum of deduction lines.
    pub total_deductions: Decimal,
    /// `gross_earnings - total_deductions`.
    pub net_salary: Decimal,
    /// Line-by-line breakdown.
    pub salary_details: SalaryDetails,
    /// Calendar days in the payroll month.
    pub total_working_days_in_month: u32,
    /// Days not covered by leave, floored at zero.
    pub days_present: Decimal,
    /// Approved paid leave days in the month.
    pub paid_leave_days: Decimal,
    /// Approved unpaid leave days in the month.
    pub unpaid_leave_days: Decimal,
    /// Loss-of-pay amount deducted.
    pub loss_of_pay_deduction: Decimal,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
    /// The calculation steps that produced the payslip.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn structure(from: NaiveDate, to: Option<NaiveDate>) -> SalaryStructure {
        SalaryStructure {
            id: 1,
            employee_id: 1,
            component_id: 1,
            amount: Decimal::from(50000),
            effective_from: from,
            effective_to: to,
        }
    }

    #[test]
    fn test_open_ended_structure_is_effective_after_start() {
        let row = structure(date(2026, 1, 1), None);
        assert!(row.is_effective_on(date(2026, 1, 1)));
        assert!(row.is_effective_on(date(2030, 6, 1)));
        assert!(!row.is_effective_on(date(2025, 12, 31)));
    }

    #[test]
    fn test_closed_structure_includes_end_date() {
        let row = structure(date(2026, 1, 1), Some(date(2026, 3, 31)));
        assert!(row.is_effective_on(date(2026, 3, 31)));
        assert!(!row.is_effective_on(date(2026, 4, 1)));
    }

    #[test]
    fn test_only_draft_and_rejected_runs_are_processable() {
        let processable: Vec<_> = PayrollRunStatus::ALL
            .iter()
            .filter(|s| s.is_processable())
            .collect();
        assert_eq!(
            processable,
            vec![&PayrollRunStatus::Draft, &PayrollRunStatus::Rejected]
        );
    }

    #[test]
    fn test_run_status_transitions() {
        use PayrollRunStatus::*;
        assert!(Draft.can_transition_to(PendingApproval));
        assert!(Approved.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Approved));
        assert!(!Paid.can_transition_to(Processed));
        assert!(!Processed.can_transition_to(Rejected));
    }

    #[test]
    fn test_payslip_line_serializes_type_and_skips_empty_meta() {
        let line = PayslipLine {
            name: "Basic Salary".to_string(),
            amount: Decimal::from(70000),
            component_type: SalaryComponentType::EarningFixed,
            unpaid_days: None,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "earning_fixed");
        assert_eq!(json["amount"], "70000");
        assert!(json.get("unpaid_days").is_none());
    }
}
