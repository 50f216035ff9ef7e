//! Loss-of-pay calculation.
//!
//! Unpaid leave reduces pay by a day rate derived from the fixed base salary
//! spread over every calendar day of the month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// The result of a loss-of-pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossOfPayResult {
    /// Base salary divided by calendar days in the month (unrounded).
    pub per_day_rate: Decimal,
    /// Amount to deduct, rounded to 2 decimal places.
    pub amount: Decimal,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Calculates the loss-of-pay deduction for unpaid leave.
///
/// `amount = round(base_salary / days_in_month * unpaid_days, 2)`, using
/// banker's rounding. The amount is zero when there are no unpaid days, no
/// base salary, or no days in the month.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::calculate_loss_of_pay;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_loss_of_pay(Decimal::from(70000), 31, Decimal::from(2), 1);
/// assert_eq!(result.amount, Decimal::from_str("4516.13").unwrap());
/// ```
pub fn calculate_loss_of_pay(
    base_salary: Decimal,
    days_in_month: u32,
    unpaid_days: Decimal,
    step_number: u32,
) -> LossOfPayResult {
    let applies = unpaid_days > Decimal::ZERO && base_salary > Decimal::ZERO && days_in_month > 0;

    let (per_day_rate, amount) = if applies {
        let per_day_rate = base_salary / Decimal::from(days_in_month);
        (per_day_rate, (per_day_rate * unpaid_days).round_dp(2))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let reasoning = if applies {
        format!(
            "{} / {} days = {} per day; {} unpaid day(s) deducts {}",
            base_salary.normalize(),
            days_in_month,
            per_day_rate.round_dp(4).normalize(),
            unpaid_days.normalize(),
            amount
        )
    } else if unpaid_days <= Decimal::ZERO {
        "No unpaid leave in the month, no loss of pay".to_string()
    } else {
        "No base salary to derive a day rate from, no loss of pay".to_string()
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "loss_of_pay".to_string(),
        rule_name: "Loss of Pay".to_string(),
        policy_ref: "payroll.lop_base".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "days_in_month": days_in_month,
            "unpaid_days": unpaid_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "per_day_rate": per_day_rate.round_dp(4).normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    LossOfPayResult {
        per_day_rate,
        amount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ==========================================================================
    // LOP-001: 70,000 basic, 31-day month, 2 unpaid days
    // ==========================================================================
    #[test]
    fn test_lop_001_two_unpaid_days_in_31_day_month() {
        let result = calculate_loss_of_pay(dec("70000"), 31, dec("2"), 4);

        assert_eq!(result.amount, dec("4516.13"));
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "loss_of_pay");
        assert_eq!(result.audit_step.output["amount"].as_str().unwrap(), "4516.13");
        assert_eq!(result.audit_step.input["days_in_month"], 31);
    }

    // ==========================================================================
    // LOP-002: no unpaid leave
    // ==========================================================================
    #[test]
    fn test_lop_002_no_unpaid_days_is_zero() {
        let result = calculate_loss_of_pay(dec("70000"), 30, Decimal::ZERO, 1);
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.per_day_rate, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("No unpaid leave"));
    }

    // ==========================================================================
    // LOP-003: no base salary
    // ==========================================================================
    #[test]
    fn test_lop_003_zero_base_is_zero() {
        let result = calculate_loss_of_pay(Decimal::ZERO, 30, dec("3"), 1);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("No base salary"));
    }

    // ==========================================================================
    // LOP-004: whole month unpaid deducts the whole base
    // ==========================================================================
    #[test]
    fn test_lop_004_full_month_unpaid() {
        let result = calculate_loss_of_pay(dec("45000"), 30, dec("30"), 1);
        assert_eq!(result.amount, dec("45000.00"));
    }

    #[test]
    fn test_february_day_rate() {
        let result = calculate_loss_of_pay(dec("28000"), 28, dec("1"), 1);
        assert_eq!(result.per_day_rate, dec("1000"));
        assert_eq!(result.amount, dec("1000.00"));
    }

    #[test]
    fn test_rounding_is_to_two_places() {
        // 10000 / 30 * 1 = 333.333...
        let result = calculate_loss_of_pay(dec("10000"), 30, dec("1"), 1);
        assert_eq!(result.amount, dec("333.33"));
        assert_eq!(result.amount.scale(), 2);
    }
}
