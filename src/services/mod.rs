//! Domain services.
//!
//! Each service is a cheap, cloneable handle over the shared [`HrStore`].
//! A public method is one unit of work: it validates its input, takes the
//! store lock once and returns an [`HrResult`](crate::error::HrResult).

pub mod documents;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod performance;
pub mod workflow;

use std::sync::Arc;

use tracing::info;

use crate::config::ConfigLoader;
use crate::store::HrStore;

pub use documents::{sanitize_file_name, DocumentService, NewDocument};
pub use employee::{
    DepartmentUpdate, EmployeeFilter, EmployeeProfileUpdate, EmployeeService, LifecycleOutcome,
    NewDepartment, NewEmployeeProfile, NewUser, OffboardingRequest,
};
pub use leave::{
    check_leave_range, BalanceChange, HolidayUpdate, LeaveApplication, LeaveBalanceView, LeaveDecision, LeaveService,
    LeaveTypeUpdate, NewHoliday, NewLeaveType, SeedSummary,
};
pub use payroll::{
    BankAdvice, InFlightGuard, NewSalaryComponent, NewSalaryStructure, PayrollService,
    RunStatusUpdate, SalaryComponentUpdate, SalaryStructureUpdate, StartPayrollRun, StartedRun,
    StructureView,
};
pub use performance::{
    AppraisalCycleUpdate, GoalUpdate, ManagerFeedback, NewAppraisalCycle, NewGoal,
    PerformanceService, ReviewInitiation, SelfEvaluation,
};
pub use workflow::{
    NewStepTemplate, NewWorkflowTemplate, StepUpdate, StepView, TemplateFilter, TemplateView,
    WorkflowService, WorkflowTemplateUpdate, WorkflowView,
};

/// Every service, wired to one store and one configuration.
#[derive(Debug, Clone)]
pub struct HrServices {
    /// The shared tables.
    pub store: HrStore,
    /// Loaded configuration.
    pub config: Arc<ConfigLoader>,
    /// Users, departments and profiles.
    pub employees: EmployeeService,
    /// Leave types, holidays, balances and requests.
    pub leave: LeaveService,
    /// Salary setup, payroll runs and payslips.
    pub payroll: PayrollService,
    /// Workflow templates and assignments.
    pub workflows: WorkflowService,
    /// Goals, cycles and reviews.
    pub performance: PerformanceService,
    /// Employee document files.
    pub documents: DocumentService,
}

impl HrServices {
    /// Wires every service to `store`.
    pub fn new(store: HrStore, config: Arc<ConfigLoader>) -> Self {
        let upload_dir = config.organisation().upload_dir.clone();
        Self {
            employees: EmployeeService::new(store.clone()),
            leave: LeaveService::new(store.clone(), Arc::clone(&config)),
            payroll: PayrollService::new(store.clone(), Arc::clone(&config)),
            workflows: WorkflowService::new(store.clone()),
            performance: PerformanceService::new(store.clone()),
            documents: DocumentService::new(store.clone(), upload_dir),
            store,
            config,
        }
    }

    /// Creates a fresh store and seeds it from configuration.
    pub fn bootstrap(config: ConfigLoader) -> Self {
        let services = Self::new(HrStore::new(), Arc::new(config));
        let summary = services.leave.seed_from_config();
        info!(
            leave_types = summary.leave_types,
            holidays = summary.holidays,
            "Seeded reference data"
        );
        services
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::{EmploymentStatus, UserRole};

    pub fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Seeded services plus a manager and one direct report, both active.
    pub struct Fixture {
        pub store: HrStore,
        pub employees: EmployeeService,
        pub leave: LeaveService,
        pub payroll: PayrollService,
        pub workflows: WorkflowService,
        pub performance: PerformanceService,
        pub manager_id: i64,
        pub manager_user_id: i64,
        pub employee_id: i64,
        pub employee_user_id: i64,
    }

    pub fn config() -> ConfigLoader {
        ConfigLoader::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default")).unwrap()
    }

    pub fn fixture() -> Fixture {
        let services = HrServices::bootstrap(config());

        let manager_user = services
            .employees
            .create_user(NewUser {
                email: "meera.iyer@example.com".to_string(),
                first_name: "Meera".to_string(),
                last_name: "Iyer".to_string(),
                role: UserRole::Manager,
                is_active: true,
            })
            .unwrap();
        let manager = services
            .employees
            .create_employee_profile(NewEmployeeProfile {
                user_id: manager_user.id,
                job_title: Some("Engineering Manager".to_string()),
                employment_status: Some(EmploymentStatus::Active),
                hire_date: Some(date(2022, 6, 1)),
                ..NewEmployeeProfile::default()
            })
            .unwrap();

        let employee_user = services
            .employees
            .create_user(NewUser {
                email: "asha.rao@example.com".to_string(),
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                role: UserRole::Employee,
                is_active: true,
            })
            .unwrap();
        let employee = services
            .employees
            .create_employee_profile(NewEmployeeProfile {
                user_id: employee_user.id,
                job_title: Some("Software Engineer".to_string()),
                employment_status: Some(EmploymentStatus::Active),
                hire_date: Some(date(2024, 1, 15)),
                bank_account_number: Some("001234567890".to_string()),
                bank_ifsc_code: Some("HDFC0000123".to_string()),
                manager_id: Some(manager.id),
                ..NewEmployeeProfile::default()
            })
            .unwrap();

        Fixture {
            store: services.store,
            employees: services.employees,
            leave: services.leave,
            payroll: services.payroll,
            workflows: services.workflows,
            performance: services.performance,
            manager_id: manager.id,
            manager_user_id: manager_user.id,
            employee_id: employee.id,
            employee_user_id: employee_user.id,
        }
    }
}
