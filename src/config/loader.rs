//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the HR engine
//! configuration from a directory of YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{HrError, HrResult};

use super::types::{
    HolidayCalendar, HolidaySeed, HrConfig, LeaveTypeSeed, LeaveTypesConfig, OrganisationConfig,
    PayrollPolicy,
};

/// Loads and provides access to the HR engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── organisation.yaml   # Name, country, uploads, server, logging
/// ├── payroll.yaml        # Provident fund policy and basic component keys
/// ├── leave_types.yaml    # Leave types seeded at start-up
/// └── holidays/
///     └── 2026.yaml       # Holidays for one calendar year
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Organisation: {}", loader.organisation().name);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: HrConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing or contains invalid
    /// YAML. The `holidays/` directory must exist but may be empty.
    pub fn load<P: AsRef<Path>>(path: P) -> HrResult<Self> {
        let path = path.as_ref();

        let organisation = Self::load_yaml::<OrganisationConfig>(&path.join("organisation.yaml"))?;
        let payroll = Self::load_yaml::<PayrollPolicy>(&path.join("payroll.yaml"))?;
        let leave_types =
            Self::load_yaml::<LeaveTypesConfig>(&path.join("leave_types.yaml"))?.leave_types;
        let holiday_calendars = Self::load_holidays(&path.join("holidays"))?;

        Ok(Self {
            config: HrConfig {
                organisation,
                payroll,
                leave_types,
                holiday_calendars,
            },
        })
    }

    /// Wraps an already-built configuration, for embedding and tests.
    pub fn from_config(config: HrConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HrResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HrError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holiday calendar file from the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> HrResult<Vec<HolidayCalendar>> {
        let dir_str = holidays_dir.display().to_string();

        if !holidays_dir.is_dir() {
            return Err(HrError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(holidays_dir).map_err(|_| HrError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut calendars = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| HrError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                let calendar = Self::load_yaml::<HolidayCalendar>(&path)?;
                Self::check_calendar_year(&calendar, &path)?;
                calendars.push(calendar);
            }
        }

        calendars.sort_by_key(|c| c.year);
        Ok(calendars)
    }

    fn check_calendar_year(calendar: &HolidayCalendar, path: &Path) -> HrResult<()> {
        use chrono::Datelike;

        match calendar.holidays.iter().find(|h| h.date.year() != calendar.year) {
            Some(stray) => Err(HrError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "holiday '{}' on {} is outside calendar year {}",
                    stray.name, stray.date, calendar.year
                ),
            }),
            None => Ok(()),
        }
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Returns the organisation settings.
    pub fn organisation(&self) -> &OrganisationConfig {
        &self.config.organisation
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.config.payroll
    }

    /// Returns the seed leave types.
    pub fn leave_types(&self) -> &[LeaveTypeSeed] {
        &self.config.leave_types
    }

    /// Iterates every configured holiday with its resolved country code.
    pub fn holidays(&self) -> impl Iterator<Item = (&HolidaySeed, &str)> {
        let default_country = self.config.organisation.country_code.as_str();
        self.config
            .holiday_calendars
            .iter()
            .flat_map(|c| c.holidays.iter())
            .map(move |h| (h, h.country_code.as_deref().unwrap_or(default_country)))
    }

    /// Returns the configured holiday dates for one year, any country.
    pub fn holiday_dates(&self, year: i32) -> Vec<NaiveDate> {
        self.config
            .holiday_calendars
            .iter()
            .filter(|c| c.year == year)
            .flat_map(|c| c.holidays.iter().map(|h| h.date))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveTypeName;
    use rust_decimal::Decimal;

    fn load_default() -> ConfigLoader {
        ConfigLoader::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default"))
            .expect("Failed to load config")
    }

    #[test]
    fn test_load_default_config() {
        let loader = load_default();
        assert_eq!(loader.organisation().country_code, "IN");
        assert_eq!(loader.payroll().provident_fund.rate, Decimal::new(12, 2));
        assert_eq!(
            loader.payroll().provident_fund.ceiling,
            Decimal::from(15000)
        );
    }

    #[test]
    fn test_default_leave_types_cover_paid_and_unpaid() {
        let loader = load_default();
        let unpaid = loader
            .leave_types()
            .iter()
            .find(|t| t.name == LeaveTypeName::Unpaid)
            .expect("unpaid leave type configured");
        assert!(!unpaid.is_paid);

        let annual = loader
            .leave_types()
            .iter()
            .find(|t| t.name == LeaveTypeName::Annual)
            .expect("annual leave type configured");
        assert!(annual.is_paid);
        assert!(annual.requires_approval);
    }

    #[test]
    fn test_holidays_resolve_default_country() {
        let loader = load_default();
        let republic_day = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
        let (_, country) = loader
            .holidays()
            .find(|(h, _)| h.date == republic_day)
            .expect("Republic Day configured");
        assert_eq!(country, "IN");
        assert!(loader.holiday_dates(2026).contains(&republic_day));
        assert!(loader.holiday_dates(1999).is_empty());
    }

    #[test]
    fn test_missing_directory_returns_not_found() {
        let result = ConfigLoader::load("/nonexistent/config");
        assert!(matches!(result, Err(HrError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("organisation.yaml"), "name: [unclosed").unwrap();
        let result = ConfigLoader::load(dir.path());
        assert!(matches!(result, Err(HrError::ConfigParseError { .. })));
    }

    #[test]
    fn test_holiday_outside_calendar_year_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("organisation.yaml"), "name: Acme\n").unwrap();
        std::fs::write(
            dir.path().join("payroll.yaml"),
            "provident_fund:\n  rate: \"0.12\"\n  ceiling: \"15000\"\nbasic_component_keys: [BASIC]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("leave_types.yaml"), "leave_types: []\n").unwrap();
        std::fs::create_dir(dir.path().join("holidays")).unwrap();
        std::fs::write(
            dir.path().join("holidays/2026.yaml"),
            "year: 2026\nholidays:\n  - name: Stray\n    date: 2027-01-01\n",
        )
        .unwrap();

        let result = ConfigLoader::load(dir.path());
        assert!(matches!(result, Err(HrError::ConfigParseError { .. })));
    }
}
