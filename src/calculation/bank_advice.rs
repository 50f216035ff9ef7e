//! CSV bank advice rendering.

use rust_decimal::Decimal;

/// Column headers of the bank advice file.
pub const BANK_ADVICE_HEADER: [&str; 5] = [
    "Employee ID",
    "Employee Name",
    "Bank Account Number",
    "IFSC Code",
    "Net Salary",
];

/// One salary credit instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAdviceRow {
    /// Employee id.
    pub employee_id: i64,
    /// Employee full name.
    pub employee_name: String,
    /// Salary account, if recorded.
    pub bank_account_number: Option<String>,
    /// Branch code, if recorded.
    pub bank_ifsc_code: Option<String>,
    /// Amount to credit.
    pub net_salary: Decimal,
}

/// File name of the bank advice for a payroll month.
///
/// ```
/// use hr_engine::calculation::bank_advice_filename;
///
/// assert_eq!(bank_advice_filename(2026, 3), "bank_advice_2026_03.csv");
/// ```
pub fn bank_advice_filename(year: i32, month: u32) -> String {
    format!("bank_advice_{year}_{month:02}.csv")
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn or_na(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

/// Renders rows as CSV, header first, one payslip per line. Amounts always
/// carry two decimal places.
pub fn render_bank_advice(rows: &[BankAdviceRow]) -> String {
    let mut out = BANK_ADVICE_HEADER.join(",");
    out.push('\n');

    for row in rows {
        let fields = [
            row.employee_id.to_string(),
            escape(&row.employee_name),
            escape(or_na(&row.bank_account_number)),
            escape(or_na(&row.bank_ifsc_code)),
            format!("{:.2}", row.net_salary.round_dp(2)),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}
