//! Per-employee payslip calculation.
//!
//! This module turns an employee's effective salary structure and the leave
//! days overlapping the payroll month into a payslip breakdown. Lookups (which
//! rows are effective, which leave is approved) happen in the payroll service;
//! everything here is pure and audited.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{LopBase, PayrollPolicy};
use crate::error::{HrError, HrResult};
use crate::models::{AuditStep, AuditTrace, AuditWarning, PayslipLine, SalaryComponentType, SalaryDetails};

use super::leave_days::days_in_month;
use super::loss_of_pay::calculate_loss_of_pay;
use super::provident_fund::{calculate_provident_fund, PROVIDENT_FUND_LINE};

/// Display name of the loss-of-pay deduction line.
pub const LOSS_OF_PAY_LINE: &str = "Loss of Pay";

/// One effective salary structure row, resolved to its component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureLine {
    /// Component name.
    pub name: String,
    /// Component type.
    pub component_type: SalaryComponentType,
    /// Monthly amount.
    pub amount: Decimal,
}

/// Everything the payslip calculation needs for one employee and month.
#[derive(Debug, Clone)]
pub struct PayslipInput<'a> {
    /// Payroll year.
    pub year: i32,
    /// Payroll month, 1 to 12.
    pub month: u32,
    /// Effective salary structure, in structure id order.
    pub lines: &'a [StructureLine],
    /// Approved paid leave days overlapping the month.
    pub paid_leave_days: Decimal,
    /// Approved unpaid leave days overlapping the month.
    pub unpaid_leave_days: Decimal,
    /// Statutory policy.
    pub policy: &'a PayrollPolicy,
}

/// The calculated figures of a payslip, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipCalculation {
    /// Sum of earnings, rounded to 2 places.
    pub gross_earnings: Decimal,
    /// Sum of deductions, rounded to 2 places.
    pub total_deductions: Decimal,
    /// `gross - deductions`, rounded to 2 places.
    pub net_salary: Decimal,
    /// Line breakdown.
    pub salary_details: SalaryDetails,
    /// Calendar days in the month.
    pub total_working_days_in_month: u32,
    /// Days not on leave, floored at zero.
    pub days_present: Decimal,
    /// Paid leave days in the month.
    pub paid_leave_days: Decimal,
    /// Unpaid leave days in the month.
    pub unpaid_leave_days: Decimal,
    /// Loss-of-pay amount deducted.
    pub loss_of_pay_deduction: Decimal,
    /// Every rule applied, in order.
    pub audit_trace: AuditTrace,
}

fn line(structure: &StructureLine) -> PayslipLine {
    PayslipLine {
        name: structure.name.clone(),
        amount: structure.amount,
        component_type: structure.component_type,
        unpaid_days: None,
    }
}

fn names(lines: &[&StructureLine]) -> Vec<String> {
    lines.iter().map(|l| l.name.clone()).collect()
}

/// Calculates a payslip from an effective salary structure.
///
/// Rules are applied in this order:
///
/// 1. Fixed earnings are summed into gross; basic components are identified.
/// 2. Fixed deductions are summed into total deductions.
/// 3. Loss of pay is deducted for unpaid leave (only when positive).
/// 4. Variable earnings are added to gross.
/// 5. Provident fund is deducted on basic pay (only when positive).
/// 6. Totals and attendance are derived.
///
/// Variable and statutory deduction rows in the structure are not summed;
/// both are computed by the engine, so such rows only produce a warning.
///
/// # Errors
///
/// Returns [`HrError::Validation`] when the month is not 1 to 12.
pub fn calculate_payslip(input: &PayslipInput<'_>) -> HrResult<PayslipCalculation> {
    let total_days = days_in_month(input.year, input.month)
        .ok_or_else(|| HrError::validation("month", format!("{} is not a month", input.month)))?;

    let mut trace = AuditTrace::default();
    let mut details = SalaryDetails::default();
    let mut gross = Decimal::ZERO;
    let mut deductions = Decimal::ZERO;

    // Fixed earnings
    let fixed_earnings: Vec<&StructureLine> = input
        .lines
        .iter()
        .filter(|l| l.component_type == SalaryComponentType::EarningFixed)
        .collect();
    let fixed_total: Decimal = fixed_earnings.iter().map(|l| l.amount).sum();
    let basic_lines: Vec<&StructureLine> = fixed_earnings
        .iter()
        .copied()
        .filter(|l| input.policy.is_basic_component(&l.name))
        .collect();
    let basic_salary: Decimal = basic_lines.iter().map(|l| l.amount).sum();

    details.earnings.extend(fixed_earnings.iter().map(|l| line(l)));
    gross += fixed_total;
    trace.steps.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "fixed_earnings".to_string(),
        rule_name: "Fixed Earnings".to_string(),
        policy_ref: "salary_structure.earning_fixed".to_string(),
        input: serde_json::json!({ "components": names(&fixed_earnings) }),
        output: serde_json::json!({
            "fixed_total": fixed_total.normalize().to_string(),
            "basic_salary": basic_salary.normalize().to_string(),
            "basic_components": names(&basic_lines)
        }),
        reasoning: format!(
            "{} fixed earning(s) total {}; {} of it is basic pay",
            fixed_earnings.len(),
            fixed_total.normalize(),
            basic_salary.normalize()
        ),
    });

    // Fixed deductions
    let fixed_deductions: Vec<&StructureLine> = input
        .lines
        .iter()
        .filter(|l| l.component_type == SalaryComponentType::DeductionFixed)
        .collect();
    let fixed_deductions_total: Decimal = fixed_deductions.iter().map(|l| l.amount).sum();
    details.deductions.extend(fixed_deductions.iter().map(|l| line(l)));
    deductions += fixed_deductions_total;
    trace.steps.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "fixed_deductions".to_string(),
        rule_name: "Fixed Deductions".to_string(),
        policy_ref: "salary_structure.deduction_fixed".to_string(),
        input: serde_json::json!({ "components": names(&fixed_deductions) }),
        output: serde_json::json!({ "total": fixed_deductions_total.normalize().to_string() }),
        reasoning: format!(
            "{} fixed deduction(s) total {}",
            fixed_deductions.len(),
            fixed_deductions_total.normalize()
        ),
    });

    // Loss of pay
    let lop_base = match input.policy.lop_base {
        LopBase::BasicComponents => basic_salary,
        LopBase::AllFixedEarnings => fixed_total,
    };
    let lop = calculate_loss_of_pay(
        lop_base,
        total_days,
        input.unpaid_leave_days,
        trace.next_step_number(),
    );
    if lop.amount > Decimal::ZERO {
        details.deductions.push(PayslipLine {
            name: LOSS_OF_PAY_LINE.to_string(),
            amount: lop.amount,
            component_type: SalaryComponentType::DeductionVariable,
            unpaid_days: Some(input.unpaid_leave_days),
        });
        deductions += lop.amount;
    }
    trace.steps.push(lop.audit_step);

    // Variable earnings
    let variable_earnings: Vec<&StructureLine> = input
        .lines
        .iter()
        .filter(|l| l.component_type == SalaryComponentType::EarningVariable)
        .collect();
    let variable_total: Decimal = variable_earnings.iter().map(|l| l.amount).sum();
    details.earnings.extend(variable_earnings.iter().map(|l| line(l)));
    gross += variable_total;
    trace.steps.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "variable_earnings".to_string(),
        rule_name: "Variable Earnings".to_string(),
        policy_ref: "salary_structure.earning_variable".to_string(),
        input: serde_json::json!({ "components": names(&variable_earnings) }),
        output: serde_json::json!({ "total": variable_total.normalize().to_string() }),
        reasoning: format!(
            "{} variable earning(s) total {}, added after loss of pay",
            variable_earnings.len(),
            variable_total.normalize()
        ),
    });

    // Provident fund
    let pf = calculate_provident_fund(
        basic_salary,
        &input.policy.provident_fund,
        trace.next_step_number(),
    );
    if pf.amount > Decimal::ZERO {
        details.deductions.push(PayslipLine {
            name: PROVIDENT_FUND_LINE.to_string(),
            amount: pf.amount,
            component_type: SalaryComponentType::StatutoryDeduction,
            unpaid_days: None,
        });
        deductions += pf.amount;
    }
    trace.steps.push(pf.audit_step);

    for ignored in input.lines.iter().filter(|l| {
        matches!(
            l.component_type,
            SalaryComponentType::DeductionVariable | SalaryComponentType::StatutoryDeduction
        )
    }) {
        trace.warnings.push(AuditWarning {
            code: "COMPONENT_NOT_APPLIED".to_string(),
            message: format!(
                "'{}' ({}) is computed by the engine; the structure amount {} was ignored",
                ignored.name,
                ignored.component_type,
                ignored.amount.normalize()
            ),
            severity: "low".to_string(),
        });
    }

    // Totals
    let gross_earnings = gross.round_dp(2);
    let total_deductions = deductions.round_dp(2);
    let net_salary = (gross - deductions).round_dp(2);
    let days_present = (Decimal::from(total_days)
        - input.unpaid_leave_days
        - input.paid_leave_days)
        .max(Decimal::ZERO);

    trace.steps.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        policy_ref: "payslip".to_string(),
        input: serde_json::json!({
            "gross_earnings": gross_earnings.to_string(),
            "total_deductions": total_deductions.to_string(),
            "days_in_month": total_days,
            "paid_leave_days": input.paid_leave_days.normalize().to_string(),
            "unpaid_leave_days": input.unpaid_leave_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_salary": net_salary.to_string(),
            "days_present": days_present.normalize().to_string()
        }),
        reasoning: format!(
            "{} - {} = {}",
            gross_earnings, total_deductions, net_salary
        ),
    });

    Ok(PayslipCalculation {
        gross_earnings,
        total_deductions,
        net_salary,
        salary_details: details,
        total_working_days_in_month: total_days,
        days_present,
        paid_leave_days: input.paid_leave_days,
        unpaid_leave_days: input.unpaid_leave_days,
        loss_of_pay_deduction: lop.amount,
        audit_trace: trace,
    })
}
