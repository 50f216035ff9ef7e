//! In-process persistence for the HR engine.
//!
//! All tables live behind one [`parking_lot::RwLock`]. A service call takes
//! the lock once through [`HrStore::read`] or [`HrStore::write`] and performs
//! its whole unit of work inside the closure, so the tables are never seen
//! half-updated by another call. Services validate before they mutate; a
//! closure that returns an error after mutating keeps its partial changes.

mod table;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::{
    AppraisalCycle, Department, EmployeeDocument, EmployeeProfile, EmployeeWorkflow,
    EmployeeWorkflowStep, Goal, Holiday, LeaveBalance, LeaveRequest, LeaveType, PayrollRun,
    Payslip, PerformanceReview, SalaryComponent, SalaryStructure, User, WorkflowStepTemplate,
    WorkflowTemplate,
};

pub use table::Table;

/// Every table of the HR data model.
#[derive(Debug, Clone)]
pub struct Tables {
    /// Login identities.
    pub users: Table<User>,
    /// Organisational units.
    pub departments: Table<Department>,
    /// Employee profiles.
    pub employees: Table<EmployeeProfile>,
    /// Uploaded document metadata.
    pub documents: Table<EmployeeDocument>,
    /// Leave categories.
    pub leave_types: Table<LeaveType>,
    /// Yearly leave balances.
    pub leave_balances: Table<LeaveBalance>,
    /// Leave requests.
    pub leave_requests: Table<LeaveRequest>,
    /// Holiday calendar.
    pub holidays: Table<Holiday>,
    /// Salary components.
    pub salary_components: Table<SalaryComponent>,
    /// Per-employee salary structure rows.
    pub salary_structures: Table<SalaryStructure>,
    /// Payroll runs.
    pub payroll_runs: Table<PayrollRun>,
    /// Payslips.
    pub payslips: Table<Payslip>,
    /// Workflow templates.
    pub workflow_templates: Table<WorkflowTemplate>,
    /// Steps of workflow templates.
    pub workflow_step_templates: Table<WorkflowStepTemplate>,
    /// Assigned workflows.
    pub employee_workflows: Table<EmployeeWorkflow>,
    /// Steps of assigned workflows.
    pub employee_workflow_steps: Table<EmployeeWorkflowStep>,
    /// Goals.
    pub goals: Table<Goal>,
    /// Appraisal cycles.
    pub appraisal_cycles: Table<AppraisalCycle>,
    /// Performance reviews.
    pub performance_reviews: Table<PerformanceReview>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: Table::new("user"),
            departments: Table::new("department"),
            employees: Table::new("employee"),
            documents: Table::new("document"),
            leave_types: Table::new("leave type"),
            leave_balances: Table::new("leave balance"),
            leave_requests: Table::new("leave request"),
            holidays: Table::new("holiday"),
            salary_components: Table::new("salary component"),
            salary_structures: Table::new("salary structure"),
            payroll_runs: Table::new("payroll run"),
            payslips: Table::new("payslip"),
            workflow_templates: Table::new("workflow template"),
            workflow_step_templates: Table::new("workflow step template"),
            employee_workflows: Table::new("employee workflow"),
            employee_workflow_steps: Table::new("employee workflow step"),
            goals: Table::new("goal"),
            appraisal_cycles: Table::new("appraisal cycle"),
            performance_reviews: Table::new("performance review"),
        }
    }
}

/// Shared handle to the table set.
///
/// Cloning the handle is cheap; every clone sees the same tables.
#[derive(Debug, Clone, Default)]
pub struct HrStore {
    tables: Arc<RwLock<Tables>>,
}

impl HrStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a read-only unit of work under a shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.read();
        f(&tables)
    }

    /// Runs a unit of work under the exclusive lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.write();
        f(&mut tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, UserRole};

    #[test]
    fn test_clones_share_tables() {
        let store = HrStore::new();
        let other = store.clone();

        store.write(|t| {
            t.departments.insert_with(|id| Department {
                id,
                name: "Finance".to_string(),
                description: None,
            });
        });

        assert_eq!(other.read(|t| t.departments.len()), 1);
    }

    #[test]
    fn test_write_returns_closure_result() {
        let store = HrStore::new();
        let id = store.write(|t| {
            t.users
                .insert_with(|id| User {
                    id,
                    email: "a@example.com".to_string(),
                    first_name: "A".to_string(),
                    last_name: "B".to_string(),
                    role: UserRole::Admin,
                    is_active: true,
                })
                .id
        });
        assert_eq!(id, 1);
    }
}
