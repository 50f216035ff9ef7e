//! Configuration loading and management for the HR engine.
//!
//! This module loads organisation settings, the statutory payroll policy,
//! seed leave types and holiday calendars from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hr_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded organisation: {}", config.organisation().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    HolidayCalendar, HolidaySeed, HrConfig, LeaveTypeSeed, LeaveTypesConfig, LoggingConfig,
    LopBase, OrganisationConfig, PayrollPolicy, ProvidentFundPolicy, ServerConfig,
};
