//! Configuration types for the HR engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::LeaveTypeName;

fn default_country_code() -> String {
    "IN".to_string()
}

fn default_upload_dir() -> String {
    "uploads/employee_documents".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output settings. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `json` or `pretty`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Organisation-wide settings from `organisation.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganisationConfig {
    /// Display name of the organisation.
    pub name: String,
    /// Country whose holiday calendar applies to leave counts.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Directory employee documents are written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for OrganisationConfig {
    fn default() -> Self {
        Self {
            name: "HR Engine".to_string(),
            country_code: default_country_code(),
            upload_dir: default_upload_dir(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Provident fund contribution policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidentFundPolicy {
    /// Employee contribution rate (e.g. 0.12).
    pub rate: Decimal,
    /// Monthly basic pay ceiling the rate is applied to.
    pub ceiling: Decimal,
}

impl Default for ProvidentFundPolicy {
    fn default() -> Self {
        Self {
            rate: Decimal::new(12, 2),
            ceiling: Decimal::from(15000),
        }
    }
}

/// Which fixed earnings the loss-of-pay day rate is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LopBase {
    /// Only components listed in `basic_component_keys`.
    #[default]
    BasicComponents,
    /// Every fixed earning component.
    AllFixedEarnings,
}

/// Statutory policy from `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollPolicy {
    /// Provident fund parameters.
    pub provident_fund: ProvidentFundPolicy,
    /// Normalised component names treated as basic pay.
    pub basic_component_keys: Vec<String>,
    /// Base of the loss-of-pay day rate.
    #[serde(default)]
    pub lop_base: LopBase,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            provident_fund: ProvidentFundPolicy::default(),
            basic_component_keys: vec!["BASIC".to_string(), "BASIC_SALARY".to_string()],
            lop_base: LopBase::default(),
        }
    }
}

impl PayrollPolicy {
    /// Returns true if a component name denotes basic pay.
    ///
    /// Names are normalised to upper case with spaces replaced by underscores
    /// before comparison.
    ///
    /// ```
    /// use hr_engine::config::PayrollPolicy;
    ///
    /// let policy = PayrollPolicy::default();
    /// assert!(policy.is_basic_component("Basic Salary"));
    /// assert!(!policy.is_basic_component("House Rent Allowance"));
    /// ```
    pub fn is_basic_component(&self, name: &str) -> bool {
        let normalised = name.trim().to_uppercase().replace(' ', "_");
        self.basic_component_keys
            .iter()
            .any(|key| key.eq_ignore_ascii_case(&normalised))
    }
}

/// A leave type created at start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypeSeed {
    /// Category.
    pub name: LeaveTypeName,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default yearly allocation.
    pub default_days_annually: Decimal,
    /// Paid or unpaid.
    pub is_paid: bool,
    /// Whether requests need a manager decision.
    pub requires_approval: bool,
}

/// Structure of `leave_types.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypesConfig {
    /// Seed leave types.
    pub leave_types: Vec<LeaveTypeSeed>,
}

/// A holiday created at start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaySeed {
    /// Display name.
    pub name: String,
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Restricted holiday flag.
    #[serde(default)]
    pub is_optional: bool,
    /// Falls back to the organisation country when absent.
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Structure of one file under `holidays/`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// Calendar year the file covers.
    pub year: i32,
    /// Holidays in that year.
    pub holidays: Vec<HolidaySeed>,
}

/// The complete configuration.
#[derive(Debug, Clone, Default)]
pub struct HrConfig {
    /// Organisation settings.
    pub organisation: OrganisationConfig,
    /// Payroll policy.
    pub payroll: PayrollPolicy,
    /// Seed leave types.
    pub leave_types: Vec<LeaveTypeSeed>,
    /// Holiday calendars, sorted by year.
    pub holiday_calendars: Vec<HolidayCalendar>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organisation_defaults_fill_missing_fields() {
        let config: OrganisationConfig = serde_yaml::from_str("name: Acme").unwrap();
        assert_eq!(config.country_code, "IN");
        assert_eq!(config.upload_dir, "uploads/employee_documents");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_default_pf_policy_matches_statutory_values() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.provident_fund.rate, Decimal::new(12, 2));
        assert_eq!(policy.provident_fund.ceiling, Decimal::from(15000));
    }

    #[test]
    fn test_basic_component_match_normalises_name() {
        let policy = PayrollPolicy::default();
        assert!(policy.is_basic_component("basic"));
        assert!(policy.is_basic_component("  basic salary "));
        assert!(policy.is_basic_component("BASIC_SALARY"));
        assert!(!policy.is_basic_component("Basic Pay"));
    }

    #[test]
    fn test_lop_base_defaults_to_basic_components() {
        let yaml = "provident_fund:\n  rate: \"0.12\"\n  ceiling: \"15000\"\nbasic_component_keys: [BASIC]\n";
        let policy: PayrollPolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.lop_base, LopBase::BasicComponents);

        let policy: PayrollPolicy =
            serde_yaml::from_str(&format!("{yaml}lop_base: all_fixed_earnings\n")).unwrap();
        assert_eq!(policy.lop_base, LopBase::AllFixedEarnings);
    }

    #[test]
    fn test_holiday_seed_parses_without_optional_fields() {
        let yaml = "year: 2026\nholidays:\n  - name: Republic Day\n    date: 2026-01-26\n";
        let calendar: HolidayCalendar = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(calendar.holidays.len(), 1);
        assert!(!calendar.holidays[0].is_optional);
        assert!(calendar.holidays[0].country_code.is_none());
    }
}
