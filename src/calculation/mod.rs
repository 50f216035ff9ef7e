//! Calculation logic for the HR engine.
//!
//! This module contains the pure rules behind leave and payroll: working-day
//! counting for leave requests, calendar overlap of leave with a payroll
//! month, loss of pay, provident fund, payslip assembly with an audit trace,
//! workflow status roll-up, and bank advice rendering.

mod bank_advice;
mod leave_days;
mod loss_of_pay;
mod payslip;
mod provident_fund;
mod workflow_rollup;

pub use bank_advice::{
    BANK_ADVICE_HEADER, BankAdviceRow, bank_advice_filename, render_bank_advice,
};
pub use leave_days::{
    LeaveDayCount, count_leave_days, days_in_month, is_weekend, month_bounds, overlap_days,
    years_spanned,
};
pub use loss_of_pay::{LossOfPayResult, calculate_loss_of_pay};
pub use payslip::{
    LOSS_OF_PAY_LINE, PayslipCalculation, PayslipInput, StructureLine, calculate_payslip,
};
pub use provident_fund::{PROVIDENT_FUND_LINE, ProvidentFundResult, calculate_provident_fund};
pub use workflow_rollup::{StepState, roll_up_workflow_status};
