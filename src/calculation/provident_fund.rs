//! Provident fund employee contribution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ProvidentFundPolicy;
use crate::models::AuditStep;

/// Display name of the provident fund deduction line.
pub const PROVIDENT_FUND_LINE: &str = "Provident Fund (PF)";

/// The result of a provident fund calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidentFundResult {
    /// Basic salary capped at the statutory ceiling.
    pub contribution_base: Decimal,
    /// Contribution, rounded to 2 decimal places.
    pub amount: Decimal,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee provident fund contribution.
///
/// `amount = round(min(basic, ceiling) * rate, 2)`; zero when basic is not
/// positive.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::calculate_provident_fund;
/// use hr_engine::config::ProvidentFundPolicy;
/// use rust_decimal::Decimal;
///
/// let result = calculate_provident_fund(Decimal::from(70000), &ProvidentFundPolicy::default(), 1);
/// assert_eq!(result.amount, Decimal::new(180000, 2));
/// ```
pub fn calculate_provident_fund(
    basic_salary: Decimal,
    policy: &ProvidentFundPolicy,
    step_number: u32,
) -> ProvidentFundResult {
    let (contribution_base, amount) = if basic_salary > Decimal::ZERO {
        let base = basic_salary.min(policy.ceiling);
        (base, (base * policy.rate).round_dp(2))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let reasoning = if basic_salary <= Decimal::ZERO {
        "No basic salary component, provident fund not applicable".to_string()
    } else if basic_salary > policy.ceiling {
        format!(
            "Basic {} exceeds ceiling {}; {} x {} = {}",
            basic_salary.normalize(),
            policy.ceiling.normalize(),
            contribution_base.normalize(),
            policy.rate.normalize(),
            amount
        )
    } else {
        format!(
            "Basic {} within ceiling {}; {} x {} = {}",
            basic_salary.normalize(),
            policy.ceiling.normalize(),
            contribution_base.normalize(),
            policy.rate.normalize(),
            amount
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "provident_fund".to_string(),
        rule_name: "Provident Fund Contribution".to_string(),
        policy_ref: "payroll.provident_fund".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "rate": policy.rate.normalize().to_string(),
            "ceiling": policy.ceiling.normalize().to_string()
        }),
        output: serde_json::json!({
            "contribution_base": contribution_base.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    ProvidentFundResult {
        contribution_base,
        amount,
        audit_step,
    }
}
