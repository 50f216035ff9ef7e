//! Users, departments, employee profiles and the employment lifecycle.
//!
//! Every change of employment status goes through [`workflow::auto_assign`]
//! inside the same unit of work.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HrError, HrResult};
use crate::models::{
    Department, EmployeeProfile, EmployeeWorkflow, EmploymentStatus, User, UserRole,
};
use crate::store::{HrStore, Tables};

use super::workflow;

fn default_true() -> bool {
    true
}

/// A new login identity.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Unique email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role within the organisation.
    #[serde(default = "default_role")]
    pub role: UserRole,
    /// Whether the account may be used.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_role() -> UserRole {
    UserRole::Employee
}

/// A new organisational unit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    /// Unique name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a department.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DepartmentUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// A new employee profile for an existing user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEmployeeProfile {
    /// The owning user.
    pub user_id: i64,
    /// Job title.
    pub job_title: Option<String>,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Initial status; onboarding when absent.
    pub employment_status: Option<EmploymentStatus>,
    /// First day of employment.
    pub hire_date: Option<NaiveDate>,
    /// Salary account number.
    pub bank_account_number: Option<String>,
    /// Branch code.
    pub bank_ifsc_code: Option<String>,
    /// Owning department.
    pub department_id: Option<i64>,
    /// Reporting manager.
    pub manager_id: Option<i64>,
}

/// Partial update of an employee profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeProfileUpdate {
    /// New job title.
    pub job_title: Option<String>,
    /// New contact number.
    pub phone_number: Option<String>,
    /// New status; triggers workflow auto-assignment when it changes.
    pub employment_status: Option<EmploymentStatus>,
    /// New hire date.
    pub hire_date: Option<NaiveDate>,
    /// New resignation date.
    pub resignation_date: Option<NaiveDate>,
    /// New termination date.
    pub termination_date: Option<NaiveDate>,
    /// New last working day.
    pub last_working_day: Option<NaiveDate>,
    /// New salary account number.
    pub bank_account_number: Option<String>,
    /// New branch code.
    pub bank_ifsc_code: Option<String>,
    /// New department.
    pub department_id: Option<i64>,
    /// New manager.
    pub manager_id: Option<i64>,
    /// Removes the manager.
    pub clear_manager: bool,
}

/// Employee list filters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeFilter {
    /// Only employees in this status.
    pub employment_status: Option<EmploymentStatus>,
    /// Only employees of this department.
    pub department_id: Option<i64>,
    /// Only direct reports of this manager.
    pub manager_id: Option<i64>,
}

/// Dates recorded when an employee leaves.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct OffboardingRequest {
    /// Date a resignation was tendered.
    pub resignation_date: Option<NaiveDate>,
    /// Date employment was terminated.
    pub termination_date: Option<NaiveDate>,
    /// Final working day.
    pub last_working_day: Option<NaiveDate>,
}

/// Result of a lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleOutcome {
    /// Human-readable summary.
    pub message: String,
    /// The profile after the action.
    pub employee: EmployeeProfile,
    /// Workflow assigned because of a status change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_workflow: Option<EmployeeWorkflow>,
}

/// Employee operations over the shared store.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    store: HrStore,
}

impl EmployeeService {
    /// Creates the service.
    pub fn new(store: HrStore) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Creates a user with a unique email address.
    pub fn create_user(&self, new: NewUser) -> HrResult<User> {
        let email = new.email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(HrError::validation("email", "must be an email address"));
        }
        if new.first_name.trim().is_empty() {
            return Err(HrError::validation("first_name", "must not be empty"));
        }

        self.store.write(|tables| {
            if tables.users.find(|u| u.email == email).is_some() {
                return Err(HrError::Duplicate {
                    entity: "user",
                    field: "email",
                    value: email,
                });
            }
            Ok(tables
                .users
                .insert_with(|id| User {
                    id,
                    email,
                    first_name: new.first_name.trim().to_string(),
                    last_name: new.last_name.trim().to_string(),
                    role: new.role,
                    is_active: new.is_active,
                })
                .clone())
        })
    }

    /// Fetches one user.
    pub fn get_user(&self, id: i64) -> HrResult<User> {
        self.store.read(|tables| tables.users.require(id).cloned())
    }

    /// Lists every user.
    pub fn list_users(&self) -> Vec<User> {
        self.store.read(|tables| tables.users.iter().cloned().collect())
    }

    // ------------------------------------------------------------------
    // Departments
    // ------------------------------------------------------------------

    /// Creates a department with a unique name.
    pub fn create_department(&self, new: NewDepartment) -> HrResult<Department> {
        let name = non_empty("name", &new.name)?;
        self.store.write(|tables| {
            ensure_unique_department(tables, &name, None)?;
            Ok(tables
                .departments
                .insert_with(|id| Department {
                    id,
                    name,
                    description: new.description,
                })
                .clone())
        })
    }

    /// Fetches one department.
    pub fn get_department(&self, id: i64) -> HrResult<Department> {
        self.store.read(|tables| tables.departments.require(id).cloned())
    }

    /// Lists every department.
    pub fn list_departments(&self) -> Vec<Department> {
        self.store
            .read(|tables| tables.departments.iter().cloned().collect())
    }

    /// Applies a partial update to a department.
    pub fn update_department(&self, id: i64, update: DepartmentUpdate) -> HrResult<Department> {
        let name = update
            .name
            .as_deref()
            .map(|n| non_empty("name", n))
            .transpose()?;
        self.store.write(|tables| {
            tables.departments.require(id)?;
            if let Some(name) = &name {
                ensure_unique_department(tables, name, Some(id))?;
            }
            let department = tables.departments.require_mut(id)?;
            if let Some(name) = name {
                department.name = name;
            }
            if let Some(description) = update.description {
                department.description = Some(description);
            }
            Ok(department.clone())
        })
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Creates the profile of an existing user, then assigns the workflow
    /// triggered by its initial status.
    pub fn create_employee_profile(&self, new: NewEmployeeProfile) -> HrResult<EmployeeProfile> {
        self.store.write(|tables| {
            tables.users.require(new.user_id)?;
            if tables.employees.find(|e| e.user_id == new.user_id).is_some() {
                return Err(HrError::Duplicate {
                    entity: "employee profile",
                    field: "user_id",
                    value: new.user_id.to_string(),
                });
            }
            if let Some(department_id) = new.department_id {
                tables.departments.require(department_id)?;
            }
            if let Some(manager_id) = new.manager_id {
                tables.employees.require(manager_id)?;
            }

            let status = new.employment_status.unwrap_or_default();
            let profile = tables
                .employees
                .insert_with(|id| EmployeeProfile {
                    id,
                    user_id: new.user_id,
                    job_title: new.job_title,
                    phone_number: new.phone_number,
                    employment_status: status,
                    hire_date: new.hire_date,
                    resignation_date: None,
                    termination_date: None,
                    last_working_day: None,
                    bank_account_number: new.bank_account_number,
                    bank_ifsc_code: new.bank_ifsc_code,
                    department_id: new.department_id,
                    manager_id: new.manager_id,
                })
                .clone();
            info!(employee_id = profile.id, user_id = profile.user_id, "Employee profile created");

            workflow::auto_assign(tables, profile.id, status)?;
            Ok(profile)
        })
    }

    /// Fetches one profile.
    pub fn get_employee(&self, id: i64) -> HrResult<EmployeeProfile> {
        self.store.read(|tables| tables.employees.require(id).cloned())
    }

    /// Lists profiles matching the filter.
    pub fn list_employees(&self, filter: EmployeeFilter) -> Vec<EmployeeProfile> {
        self.store.read(|tables| {
            tables.employees.filter_cloned(|e| {
                filter.employment_status.is_none_or(|s| e.employment_status == s)
                    && filter.department_id.is_none_or(|d| e.department_id == Some(d))
                    && filter.manager_id.is_none_or(|m| e.manager_id == Some(m))
            })
        })
    }

    /// Lists a manager's direct reports.
    pub fn direct_reports(&self, manager_id: i64) -> HrResult<Vec<EmployeeProfile>> {
        self.store.read(|tables| {
            tables.employees.require(manager_id)?;
            Ok(tables
                .employees
                .filter_cloned(|e| e.manager_id == Some(manager_id)))
        })
    }

    /// Applies a partial update. A status change assigns the workflow it
    /// triggers.
    pub fn update_employee_profile(
        &self,
        id: i64,
        update: EmployeeProfileUpdate,
    ) -> HrResult<EmployeeProfile> {
        self.store.write(|tables| {
            let old_status = tables.employees.require(id)?.employment_status;
            if let Some(department_id) = update.department_id {
                tables.departments.require(department_id)?;
            }
            if !update.clear_manager {
                if let Some(manager_id) = update.manager_id {
                    check_manager(tables, id, manager_id)?;
                }
            }

            let profile = tables.employees.require_mut(id)?;
            if let Some(v) = update.job_title {
                profile.job_title = Some(v);
            }
            if let Some(v) = update.phone_number {
                profile.phone_number = Some(v);
            }
            if let Some(v) = update.employment_status {
                profile.employment_status = v;
            }
            if let Some(v) = update.hire_date {
                profile.hire_date = Some(v);
            }
            if let Some(v) = update.resignation_date {
                profile.resignation_date = Some(v);
            }
            if let Some(v) = update.termination_date {
                profile.termination_date = Some(v);
            }
            if let Some(v) = update.last_working_day {
                profile.last_working_day = Some(v);
            }
            if let Some(v) = update.bank_account_number {
                profile.bank_account_number = Some(v);
            }
            if let Some(v) = update.bank_ifsc_code {
                profile.bank_ifsc_code = Some(v);
            }
            if let Some(v) = update.department_id {
                profile.department_id = Some(v);
            }
            if update.clear_manager {
                profile.manager_id = None;
            } else if let Some(v) = update.manager_id {
                profile.manager_id = Some(v);
            }
            let profile = profile.clone();

            if profile.employment_status != old_status {
                info!(
                    employee_id = id,
                    from = %old_status,
                    to = %profile.employment_status,
                    "Employment status changed"
                );
                workflow::auto_assign(tables, id, profile.employment_status)?;
            }
            Ok(profile)
        })
    }

    /// Moves an onboarding employee to active.
    ///
    /// The hire date defaults to today when unset. Employees in any other
    /// status are left unchanged with an explanatory message.
    pub fn complete_onboarding(&self, employee_id: i64) -> HrResult<LifecycleOutcome> {
        self.store.write(|tables| {
            let profile = tables.employees.require(employee_id)?.clone();
            match profile.employment_status {
                EmploymentStatus::Onboarding => {}
                EmploymentStatus::Active => {
                    return Ok(LifecycleOutcome {
                        message: format!("Employee {employee_id} is already ACTIVE."),
                        employee: profile,
                        assigned_workflow: None,
                    });
                }
                other => {
                    return Ok(LifecycleOutcome {
                        message: format!(
                            "Employee {employee_id} is not in ONBOARDING status ({other}). Cannot complete onboarding."
                        ),
                        employee: profile,
                        assigned_workflow: None,
                    });
                }
            }

            let profile = tables.employees.require_mut(employee_id)?;
            profile.employment_status = EmploymentStatus::Active;
            if profile.hire_date.is_none() {
                profile.hire_date = Some(Utc::now().date_naive());
            }
            let profile = profile.clone();

            let assigned_workflow =
                workflow::auto_assign(tables, employee_id, EmploymentStatus::Active)?;
            info!(employee_id, "Onboarding completed");
            Ok(LifecycleOutcome {
                message: format!(
                    "Onboarding completed. Status set to {}.",
                    EmploymentStatus::Active
                ),
                employee: profile,
                assigned_workflow,
            })
        })
    }

    /// Records leaving dates and, for an active employee, moves the status
    /// to terminated (termination date given) or resigned (resignation date
    /// given).
    pub fn initiate_offboarding(
        &self,
        employee_id: i64,
        request: OffboardingRequest,
    ) -> HrResult<LifecycleOutcome> {
        self.store.write(|tables| {
            let old_status = tables.employees.require(employee_id)?.employment_status;

            let mut new_status = old_status;
            if old_status == EmploymentStatus::Active {
                if request.termination_date.is_some() {
                    new_status = EmploymentStatus::Terminated;
                } else if request.resignation_date.is_some() {
                    new_status = EmploymentStatus::Resigned;
                }
            }

            let has_dates = request.resignation_date.is_some()
                || request.termination_date.is_some()
                || request.last_working_day.is_some();
            if !has_dates && new_status == old_status {
                let profile = tables.employees.require(employee_id)?.clone();
                return Ok(LifecycleOutcome {
                    message: "No changes to apply for offboarding.".to_string(),
                    employee: profile,
                    assigned_workflow: None,
                });
            }

            let profile = tables.employees.require_mut(employee_id)?;
            if let Some(date) = request.resignation_date {
                profile.resignation_date = Some(date);
            }
            if let Some(date) = request.termination_date {
                profile.termination_date = Some(date);
            }
            if let Some(date) = request.last_working_day {
                profile.last_working_day = Some(date);
            }
            profile.employment_status = new_status;
            let profile = profile.clone();

            let assigned_workflow = if new_status != old_status {
                info!(employee_id, from = %old_status, to = %new_status, "Offboarding initiated");
                workflow::auto_assign(tables, employee_id, new_status)?
            } else {
                None
            };

            Ok(LifecycleOutcome {
                message: format!(
                    "Offboarding process updated/initiated for employee {employee_id}. Status: {new_status}"
                ),
                employee: profile,
                assigned_workflow,
            })
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

fn non_empty(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn ensure_unique_department(tables: &Tables, name: &str, except: Option<i64>) -> HrResult<()> {
    match tables
        .departments
        .find(|d| d.name.eq_ignore_ascii_case(name) && Some(d.id) != except)
    {
        Some(_) => Err(HrError::Duplicate {
            entity: "department",
            field: "name",
            value: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Rejects a manager that does not exist or whose reporting chain leads
/// back to the employee.
fn check_manager(tables: &Tables, employee_id: i64, manager_id: i64) -> HrResult<()> {
    tables.employees.require(manager_id)?;

    let mut seen = HashSet::new();
    let mut current = Some(manager_id);
    while let Some(id) = current {
        if id == employee_id {
            return Err(HrError::validation(
                "manager_id",
                "the reporting line would form a cycle",
            ));
        }
        if !seen.insert(id) {
            break;
        }
        current = tables.employees.get(id).and_then(|e| e.manager_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkflowStatus, WorkflowType};
    use crate::services::test_support::{date, fixture};
    use crate::services::workflow::{NewStepTemplate, NewWorkflowTemplate};

    fn template_for(fx: &crate::services::test_support::Fixture, status: EmploymentStatus, name: &str) -> i64 {
        fx.workflows
            .create_template(NewWorkflowTemplate {
                name: name.to_string(),
                description: None,
                workflow_type: WorkflowType::Onboarding,
                is_active: true,
                auto_assign_on_status: Some(status),
                steps: vec![NewStepTemplate {
                    name: "Checklist".to_string(),
                    description: None,
                    order: 1,
                    is_mandatory: true,
                }],
            })
            .unwrap()
            .template
            .id
    }

    fn new_user(service: &EmployeeService, email: &str) -> User {
        service
            .create_user(NewUser {
                email: email.to_string(),
                first_name: "Dev".to_string(),
                last_name: "Nair".to_string(),
                role: UserRole::Employee,
                is_active: true,
            })
            .unwrap()
    }

    #[test]
    fn test_user_email_is_unique_and_normalised() {
        let fx = fixture();
        let user = new_user(&fx.employees, "Dev.Nair@Example.com");
        assert_eq!(user.email, "dev.nair@example.com");

        let err = fx
            .employees
            .create_user(NewUser {
                email: "dev.nair@example.com".to_string(),
                first_name: "Other".to_string(),
                last_name: String::new(),
                role: UserRole::Admin,
                is_active: true,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Duplicate { field: "email", .. }));

        let err = fx
            .employees
            .create_user(NewUser {
                email: "not-an-email".to_string(),
                first_name: "Other".to_string(),
                last_name: String::new(),
                role: UserRole::Admin,
                is_active: true,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));
    }

    #[test]
    fn test_department_names_are_unique() {
        let fx = fixture();
        fx.employees
            .create_department(NewDepartment {
                name: "Finance".to_string(),
                description: None,
            })
            .unwrap();
        let err = fx
            .employees
            .create_department(NewDepartment {
                name: "finance".to_string(),
                description: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Duplicate { .. }));
    }

    #[test]
    fn test_one_profile_per_user() {
        let fx = fixture();
        let err = fx
            .employees
            .create_employee_profile(NewEmployeeProfile {
                user_id: fx.employee_user_id,
                ..NewEmployeeProfile::default()
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Duplicate { .. }));
    }

    // ==========================================================================
    // EM-001: profile creation assigns the workflow for the initial status
    // ==========================================================================
    #[test]
    fn test_em_001_new_profile_gets_onboarding_workflow() {
        let fx = fixture();
        let template_id = template_for(&fx, EmploymentStatus::Onboarding, "Joiner checklist");
        let user = new_user(&fx.employees, "joiner@example.com");

        let profile = fx
            .employees
            .create_employee_profile(NewEmployeeProfile {
                user_id: user.id,
                manager_id: Some(fx.manager_id),
                ..NewEmployeeProfile::default()
            })
            .unwrap();
        assert_eq!(profile.employment_status, EmploymentStatus::Onboarding);

        let workflows = fx.workflows.list_employee_workflows(profile.id, None).unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].workflow.template_id, template_id);
        assert_eq!(workflows[0].workflow.status, WorkflowStatus::Pending);
    }

    // ==========================================================================
    // EM-002: onboarding completion
    // ==========================================================================
    #[test]
    fn test_em_002_complete_onboarding() {
        let fx = fixture();
        template_for(&fx, EmploymentStatus::Active, "Probation");
        let user = new_user(&fx.employees, "joiner@example.com");
        let profile = fx
            .employees
            .create_employee_profile(NewEmployeeProfile {
                user_id: user.id,
                ..NewEmployeeProfile::default()
            })
            .unwrap();

        let outcome = fx.employees.complete_onboarding(profile.id).unwrap();
        assert_eq!(outcome.message, "Onboarding completed. Status set to active.");
        assert_eq!(outcome.employee.employment_status, EmploymentStatus::Active);
        assert_eq!(outcome.employee.hire_date, Some(Utc::now().date_naive()));
        assert!(outcome.assigned_workflow.is_some());

        let again = fx.employees.complete_onboarding(profile.id).unwrap();
        assert_eq!(again.message, format!("Employee {} is already ACTIVE.", profile.id));
        assert!(again.assigned_workflow.is_none());
    }

    // ==========================================================================
    // EM-003: offboarding moves active employees out
    // ==========================================================================
    #[test]
    fn test_em_003_offboarding() {
        let fx = fixture();
        let template_id = template_for(&fx, EmploymentStatus::Resigned, "Exit");

        let outcome = fx
            .employees
            .initiate_offboarding(
                fx.employee_id,
                OffboardingRequest {
                    resignation_date: Some(date(2026, 5, 1)),
                    termination_date: None,
                    last_working_day: Some(date(2026, 5, 31)),
                },
            )
            .unwrap();
        assert_eq!(outcome.employee.employment_status, EmploymentStatus::Resigned);
        assert_eq!(outcome.employee.last_working_day, Some(date(2026, 5, 31)));
        assert_eq!(outcome.assigned_workflow.unwrap().template_id, template_id);

        // Already resigned: only dates move.
        let outcome = fx
            .employees
            .initiate_offboarding(
                fx.employee_id,
                OffboardingRequest {
                    last_working_day: Some(date(2026, 6, 15)),
                    ..OffboardingRequest::default()
                },
            )
            .unwrap();
        assert_eq!(outcome.employee.employment_status, EmploymentStatus::Resigned);
        assert_eq!(outcome.employee.last_working_day, Some(date(2026, 6, 15)));
        assert!(outcome.assigned_workflow.is_none());

        let outcome = fx
            .employees
            .initiate_offboarding(fx.employee_id, OffboardingRequest::default())
            .unwrap();
        assert_eq!(outcome.message, "No changes to apply for offboarding.");
    }

    #[test]
    fn test_termination_wins_over_resignation() {
        let fx = fixture();
        let outcome = fx
            .employees
            .initiate_offboarding(
                fx.employee_id,
                OffboardingRequest {
                    resignation_date: Some(date(2026, 5, 1)),
                    termination_date: Some(date(2026, 5, 2)),
                    last_working_day: None,
                },
            )
            .unwrap();
        assert_eq!(outcome.employee.employment_status, EmploymentStatus::Terminated);
    }

    // ==========================================================================
    // EM-004: reporting cycles are rejected
    // ==========================================================================
    #[test]
    fn test_em_004_manager_cycles_rejected() {
        let fx = fixture();

        let err = fx
            .employees
            .update_employee_profile(
                fx.employee_id,
                EmployeeProfileUpdate {
                    manager_id: Some(fx.employee_id),
                    ..EmployeeProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));

        // employee reports to manager; manager -> employee would loop.
        let err = fx
            .employees
            .update_employee_profile(
                fx.manager_id,
                EmployeeProfileUpdate {
                    manager_id: Some(fx.employee_id),
                    ..EmployeeProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));

        let cleared = fx
            .employees
            .update_employee_profile(
                fx.employee_id,
                EmployeeProfileUpdate {
                    clear_manager: true,
                    ..EmployeeProfileUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.manager_id, None);
    }

    #[test]
    fn test_status_update_triggers_auto_assign() {
        let fx = fixture();
        template_for(&fx, EmploymentStatus::OnNotice, "Notice period");

        fx.employees
            .update_employee_profile(
                fx.employee_id,
                EmployeeProfileUpdate {
                    employment_status: Some(EmploymentStatus::OnNotice),
                    ..EmployeeProfileUpdate::default()
                },
            )
            .unwrap();

        let workflows = fx.workflows.list_employee_workflows(fx.employee_id, None).unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].template_name, "Notice period");
    }

    #[test]
    fn test_filters_and_direct_reports() {
        let fx = fixture();
        let reports = fx.employees.direct_reports(fx.manager_id).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, fx.employee_id);

        let active = fx.employees.list_employees(EmployeeFilter {
            employment_status: Some(EmploymentStatus::Active),
            ..EmployeeFilter::default()
        });
        assert_eq!(active.len(), 2);
    }
}
