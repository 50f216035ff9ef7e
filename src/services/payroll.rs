//! Salary structures, payroll runs, payslips and bank advice.
//!
//! A run is processed on the blocking pool after the create request
//! returns. At most one run per (month, year) is processed at a time; the
//! in-flight marker is held by an [`InFlightGuard`] owned by the background
//! task and released when it drops.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::calculation::{
    bank_advice_filename, calculate_payslip, month_bounds, overlap_days, render_bank_advice,
    BankAdviceRow, PayslipInput, StructureLine,
};
use crate::config::{ConfigLoader, PayrollPolicy};
use crate::error::{HrError, HrResult};
use crate::models::{
    LeaveRequestStatus, PayrollRun, PayrollRunStatus, Payslip, SalaryComponent,
    SalaryComponentType, SalaryStructure,
};
use crate::store::{HrStore, Tables};

fn default_true() -> bool {
    true
}

/// A new salary component.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSalaryComponent {
    /// Unique name.
    pub name: String,
    /// How the component is treated.
    pub component_type: SalaryComponentType,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Taxable flag.
    #[serde(default = "default_true")]
    pub is_taxable: bool,
    /// Informational formula.
    #[serde(default)]
    pub calculation_formula: Option<String>,
}

/// Partial update of a salary component.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SalaryComponentUpdate {
    /// New name.
    pub name: Option<String>,
    /// New type.
    pub component_type: Option<SalaryComponentType>,
    /// New description.
    pub description: Option<String>,
    /// New taxable flag.
    pub is_taxable: Option<bool>,
    /// New formula.
    pub calculation_formula: Option<String>,
}

/// A new salary structure row.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSalaryStructure {
    /// Employee paid.
    pub employee_id: i64,
    /// Component paid or deducted.
    pub component_id: i64,
    /// Monthly amount.
    pub amount: Decimal,
    /// First day the row applies.
    pub effective_from: NaiveDate,
    /// Last day the row applies; open-ended when absent.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

/// Partial update of a salary structure row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SalaryStructureUpdate {
    /// New monthly amount.
    pub amount: Option<Decimal>,
    /// New end date.
    pub effective_to: Option<NaiveDate>,
}

/// A structure row with its component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureView {
    /// The stored row.
    #[serde(flatten)]
    pub structure: SalaryStructure,
    /// Component name.
    pub component_name: String,
    /// Component type.
    pub component_type: SalaryComponentType,
}

/// A request to create (or reset) and process the run of a month.
#[derive(Debug, Clone, Deserialize)]
pub struct StartPayrollRun {
    /// Payroll month, 1 to 12.
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Restricts processing to these employees; all active otherwise.
    #[serde(default)]
    pub employee_ids: Option<Vec<i64>>,
    /// User starting the run.
    #[serde(default)]
    pub actor_user_id: Option<i64>,
}

/// A manual run status change.
#[derive(Debug, Clone, Deserialize)]
pub struct RunStatusUpdate {
    /// Target status.
    pub status: PayrollRunStatus,
    /// Replaces the run notes when given.
    #[serde(default)]
    pub notes: Option<String>,
    /// User making the change.
    #[serde(default)]
    pub actor_user_id: Option<i64>,
}

/// The bank advice of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankAdvice {
    /// CSV file contents.
    Csv {
        /// Suggested download name.
        filename: String,
        /// The CSV text.
        content: String,
    },
    /// The run has no payslips.
    Empty {
        /// Notice for the caller.
        message: String,
    },
}

/// A run accepted for background processing.
#[derive(Debug)]
pub struct StartedRun {
    /// The run as stored when processing was dispatched.
    pub run: PayrollRun,
    /// The processing task.
    pub task: JoinHandle<()>,
}

/// Holds the in-flight marker of one (month, year) until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    markers: Arc<Mutex<HashSet<(u32, i32)>>>,
    key: (u32, i32),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.markers.lock().remove(&self.key);
    }
}

/// Payroll operations over the shared store.
#[derive(Debug, Clone)]
pub struct PayrollService {
    store: HrStore,
    config: Arc<ConfigLoader>,
    in_flight: Arc<Mutex<HashSet<(u32, i32)>>>,
}

impl PayrollService {
    /// Creates the service.
    pub fn new(store: HrStore, config: Arc<ConfigLoader>) -> Self {
        Self {
            store,
            config,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn policy(&self) -> &PayrollPolicy {
        self.config.payroll()
    }

    /// Claims the in-flight marker for a payroll month.
    ///
    /// # Errors
    ///
    /// [`HrError::PayrollRunInFlight`] if the marker is already held.
    pub fn acquire_in_flight(&self, month: u32, year: i32) -> HrResult<InFlightGuard> {
        let key = (month, year);
        if !self.in_flight.lock().insert(key) {
            return Err(HrError::PayrollRunInFlight { month, year });
        }
        Ok(InFlightGuard {
            markers: Arc::clone(&self.in_flight),
            key,
        })
    }

    fn is_in_flight(&self, month: u32, year: i32) -> bool {
        self.in_flight.lock().contains(&(month, year))
    }

    // ------------------------------------------------------------------
    // Components and structures
    // ------------------------------------------------------------------

    /// Creates a salary component with a unique name.
    pub fn create_component(&self, new: NewSalaryComponent) -> HrResult<SalaryComponent> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(HrError::validation("name", "must not be empty"));
        }
        self.store.write(|tables| {
            ensure_unique_component(tables, &name, None)?;
            Ok(tables
                .salary_components
                .insert_with(|id| SalaryComponent {
                    id,
                    name,
                    component_type: new.component_type,
                    description: new.description,
                    is_taxable: new.is_taxable,
                    calculation_formula: new.calculation_formula,
                })
                .clone())
        })
    }

    /// Lists every salary component.
    pub fn list_components(&self) -> Vec<SalaryComponent> {
        self.store
            .read(|tables| tables.salary_components.iter().cloned().collect())
    }

    /// Fetches one salary component.
    pub fn get_component(&self, id: i64) -> HrResult<SalaryComponent> {
        self.store
            .read(|tables| tables.salary_components.require(id).cloned())
    }

    /// Applies a partial update to a salary component.
    pub fn update_component(
        &self,
        id: i64,
        update: SalaryComponentUpdate,
    ) -> HrResult<SalaryComponent> {
        self.store.write(|tables| {
            tables.salary_components.require(id)?;
            let name = match update.name.as_deref().map(str::trim) {
                Some("") => return Err(HrError::validation("name", "must not be empty")),
                Some(name) => {
                    ensure_unique_component(tables, name, Some(id))?;
                    Some(name.to_string())
                }
                None => None,
            };

            let component = tables.salary_components.require_mut(id)?;
            if let Some(name) = name {
                component.name = name;
            }
            if let Some(component_type) = update.component_type {
                component.component_type = component_type;
            }
            if let Some(description) = update.description {
                component.description = Some(description);
            }
            if let Some(is_taxable) = update.is_taxable {
                component.is_taxable = is_taxable;
            }
            if let Some(formula) = update.calculation_formula {
                component.calculation_formula = Some(formula);
            }
            Ok(component.clone())
        })
    }

    /// Adds a salary structure row.
    pub fn add_structure(&self, new: NewSalaryStructure) -> HrResult<StructureView> {
        check_structure(new.amount, new.effective_from, new.effective_to)?;
        self.store.write(|tables| {
            tables.employees.require(new.employee_id)?;
            tables.salary_components.require(new.component_id)?;
            let structure = tables
                .salary_structures
                .insert_with(|id| SalaryStructure {
                    id,
                    employee_id: new.employee_id,
                    component_id: new.component_id,
                    amount: new.amount,
                    effective_from: new.effective_from,
                    effective_to: new.effective_to,
                })
                .clone();
            structure_view(tables, structure)
        })
    }

    /// Lists an employee's structure rows, optionally only those effective
    /// on a date.
    pub fn list_structures(
        &self,
        employee_id: i64,
        effective_on: Option<NaiveDate>,
    ) -> HrResult<Vec<StructureView>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            tables
                .salary_structures
                .iter()
                .filter(|s| s.employee_id == employee_id)
                .filter(|s| effective_on.is_none_or(|d| s.is_effective_on(d)))
                .map(|s| structure_view(tables, s.clone()))
                .collect()
        })
    }

    /// Changes the amount or end date of a structure row.
    pub fn update_structure(
        &self,
        id: i64,
        update: SalaryStructureUpdate,
    ) -> HrResult<StructureView> {
        self.store.write(|tables| {
            let current = tables.salary_structures.require(id)?;
            let amount = update.amount.unwrap_or(current.amount);
            let effective_to = update.effective_to.or(current.effective_to);
            check_structure(amount, current.effective_from, effective_to)?;

            let structure = tables.salary_structures.require_mut(id)?;
            structure.amount = amount;
            structure.effective_to = effective_to;
            let structure = structure.clone();
            structure_view(tables, structure)
        })
    }

    /// Deletes a structure row.
    pub fn delete_structure(&self, id: i64) -> HrResult<()> {
        self.store.write(|tables| {
            tables.salary_structures.require(id)?;
            tables.salary_structures.remove(id);
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Runs
    // ------------------------------------------------------------------

    /// Creates (or resets) the run of a month and processes it in the
    /// background.
    ///
    /// # Errors
    ///
    /// * [`HrError::Validation`] for a month outside 1 to 12.
    /// * [`HrError::PayrollRunInFlight`] while the month is being processed.
    /// * [`HrError::BusinessRule`] when the month's run is past `draft` or
    ///   `rejected`.
    pub fn start_payroll_run(&self, request: StartPayrollRun) -> HrResult<StartedRun> {
        let StartPayrollRun {
            month,
            year,
            employee_ids,
            actor_user_id,
        } = request;
        if !(1..=12).contains(&month) {
            return Err(HrError::validation("month", "must be between 1 and 12"));
        }

        let guard = self.acquire_in_flight(month, year)?;
        let run = self.store.write(|tables| {
            if let Some(actor) = actor_user_id {
                tables.users.require(actor)?;
            }
            let existing = tables
                .payroll_runs
                .find(|r| r.month == month && r.year == year)
                .cloned();

            match existing {
                Some(run) if !run.status.is_processable() => Err(HrError::rule(format!(
                    "Payroll run for {month:02}/{year} already exists with status {}.",
                    run.status
                ))),
                Some(run) => {
                    let run = tables.payroll_runs.require_mut(run.id)?;
                    run.status = PayrollRunStatus::Draft;
                    run.run_date = Utc::now();
                    run.processed_by_user_id = actor_user_id;
                    run.notes = None;
                    Ok(run.clone())
                }
                None => Ok(tables
                    .payroll_runs
                    .insert_with(|id| PayrollRun {
                        id,
                        month,
                        year,
                        status: PayrollRunStatus::Draft,
                        run_date: Utc::now(),
                        processed_by_user_id: actor_user_id,
                        notes: None,
                    })
                    .clone()),
            }
        })?;

        info!(run_id = run.id, month, year, "Payroll run dispatched");
        let service = self.clone();
        let run_id = run.id;
        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            match service.process_payroll_run(run_id, employee_ids) {
                Ok(run) => info!(run_id, status = %run.status, "Payroll run finished"),
                Err(err) => warn!(run_id, error = %err, "Payroll run failed"),
            }
        });

        Ok(StartedRun { run, task })
    }

    /// Regenerates every payslip of a `draft` or `rejected` run.
    ///
    /// Existing payslips are deleted first. Explicit employee ids that do
    /// not exist are dropped; without ids every active employee is
    /// processed. Employees that fail are logged and skipped.
    pub fn process_payroll_run(
        &self,
        run_id: i64,
        employee_ids: Option<Vec<i64>>,
    ) -> HrResult<PayrollRun> {
        let (run, targets) = self.store.write(|tables| {
            let run = tables.payroll_runs.require(run_id)?.clone();
            if !run.status.is_processable() {
                return Err(HrError::rule(format!(
                    "Payroll run {run_id} is {} and cannot be processed.",
                    run.status
                )));
            }
            let removed = tables.payslips.retain(|p| p.payroll_run_id != run_id);
            if removed > 0 {
                debug!(run_id, removed, "Deleted payslips before reprocessing");
            }

            let targets: Vec<i64> = match employee_ids {
                Some(ids) => {
                    let mut seen = HashSet::new();
                    ids.into_iter()
                        .filter(|id| tables.employees.contains(*id) && seen.insert(*id))
                        .collect()
                }
                None => tables
                    .employees
                    .iter()
                    .filter(|e| e.is_active())
                    .map(|e| e.id)
                    .collect(),
            };
            Ok((run, targets))
        })?;

        if targets.is_empty() {
            return self.finish_run(
                run_id,
                PayrollRunStatus::Draft,
                "No employees found/eligible for processing.".to_string(),
            );
        }

        let mut generated = 0usize;
        for employee_id in targets {
            let outcome = self
                .store
                .write(|tables| calculate_employee_payroll(tables, self.policy(), employee_id, &run));
            match outcome {
                Ok(Some(payslip)) => {
                    generated += 1;
                    debug!(run_id, employee_id, net = %payslip.net_salary, "Payslip generated");
                }
                Ok(None) => debug!(run_id, employee_id, "Employee skipped"),
                Err(err) => warn!(run_id, employee_id, error = %err, "Payslip calculation failed"),
            }
        }

        if generated > 0 {
            self.finish_run(
                run_id,
                PayrollRunStatus::PendingApproval,
                format!("{generated} payslips generated."),
            )
        } else {
            self.finish_run(
                run_id,
                PayrollRunStatus::Draft,
                "No payslips were generated (e.g., no active structure, not active, or calculation error).".to_string(),
            )
        }
    }

    fn finish_run(&self, run_id: i64, status: PayrollRunStatus, notes: String) -> HrResult<PayrollRun> {
        self.store.write(|tables| {
            let run = tables.payroll_runs.require_mut(run_id)?;
            run.status = status;
            run.notes = Some(notes);
            Ok(run.clone())
        })
    }

    /// Calculates and stores one employee's payslip for a run, replacing
    /// any earlier payslip of that employee in the run.
    ///
    /// Returns `None` when the employee is not active or has no salary
    /// structure effective on the first day of the month.
    pub fn calculate_employee_payroll(
        &self,
        employee_id: i64,
        run_id: i64,
    ) -> HrResult<Option<Payslip>> {
        self.store.write(|tables| {
            let run = tables.payroll_runs.require(run_id)?.clone();
            calculate_employee_payroll(tables, self.policy(), employee_id, &run)
        })
    }

    /// Applies a manual status change allowed by the run state machine.
    pub fn update_run_status(&self, run_id: i64, update: RunStatusUpdate) -> HrResult<PayrollRun> {
        self.store.write(|tables| {
            if let Some(actor) = update.actor_user_id {
                tables.users.require(actor)?;
            }
            let run = tables.payroll_runs.require_mut(run_id)?;
            if self.is_in_flight(run.month, run.year) {
                return Err(HrError::PayrollRunInFlight {
                    month: run.month,
                    year: run.year,
                });
            }
            if !run.status.can_transition_to(update.status) {
                return Err(HrError::InvalidTransition {
                    entity: "payroll run",
                    from: run.status.to_string(),
                    to: update.status.to_string(),
                });
            }

            info!(run_id, from = %run.status, to = %update.status, "Payroll run status changed");
            run.status = update.status;
            if let Some(notes) = update.notes {
                run.notes = Some(notes);
            }
            if let Some(actor) = update.actor_user_id {
                run.processed_by_user_id = Some(actor);
            }
            Ok(run.clone())
        })
    }

    /// Fetches one run.
    pub fn get_run(&self, id: i64) -> HrResult<PayrollRun> {
        self.store.read(|tables| tables.payroll_runs.require(id).cloned())
    }

    /// Lists runs, latest period first.
    pub fn list_runs(&self, year: Option<i32>) -> Vec<PayrollRun> {
        let mut runs = self.store.read(|tables| {
            tables
                .payroll_runs
                .filter_cloned(|r| year.is_none_or(|y| r.year == y))
        });
        runs.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        runs
    }

    // ------------------------------------------------------------------
    // Payslips
    // ------------------------------------------------------------------

    /// Lists the payslips of a run.
    pub fn list_payslips_for_run(&self, run_id: i64) -> HrResult<Vec<Payslip>> {
        self.store.read(|tables| {
            tables.payroll_runs.require(run_id)?;
            Ok(tables
                .payslips
                .filter_cloned(|p| p.payroll_run_id == run_id))
        })
    }

    /// Lists an employee's payslips.
    pub fn list_payslips_for_employee(&self, employee_id: i64) -> HrResult<Vec<Payslip>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            Ok(tables
                .payslips
                .filter_cloned(|p| p.employee_id == employee_id))
        })
    }

    /// Fetches one payslip.
    pub fn get_payslip(&self, id: i64) -> HrResult<Payslip> {
        self.store.read(|tables| tables.payslips.require(id).cloned())
    }

    /// Builds the salary credit file of an approved, processed or paid run.
    pub fn bank_advice(&self, run_id: i64) -> HrResult<BankAdvice> {
        self.store.read(|tables| {
            let run = tables.payroll_runs.require(run_id)?;
            if !run.status.allows_bank_advice() {
                return Err(HrError::rule(format!(
                    "Bank advice can only be generated for approved, processed or paid runs. Current status: {}.",
                    run.status
                )));
            }

            let rows: Vec<BankAdviceRow> = tables
                .payslips
                .iter()
                .filter(|p| p.payroll_run_id == run_id)
                .filter_map(|p| {
                    let employee = tables.employees.get(p.employee_id)?;
                    let user = tables.users.get(employee.user_id)?;
                    Some(BankAdviceRow {
                        employee_id: employee.id,
                        employee_name: user.full_name(),
                        bank_account_number: employee.bank_account_number.clone(),
                        bank_ifsc_code: employee.bank_ifsc_code.clone(),
                        net_salary: p.net_salary,
                    })
                })
                .collect();

            if rows.is_empty() {
                return Ok(BankAdvice::Empty {
                    message: "No payslips found for this payroll run.".to_string(),
                });
            }
            Ok(BankAdvice::Csv {
                filename: bank_advice_filename(run.year, run.month),
                content: render_bank_advice(&rows),
            })
        })
    }
}

fn check_structure(
    amount: Decimal,
    effective_from: NaiveDate,
    effective_to: Option<NaiveDate>,
) -> HrResult<()> {
    if amount < Decimal::ZERO {
        return Err(HrError::validation("amount", "must not be negative"));
    }
    if effective_to.is_some_and(|to| to < effective_from) {
        return Err(HrError::validation(
            "effective_to",
            "must not be before effective_from",
        ));
    }
    Ok(())
}

fn ensure_unique_component(tables: &Tables, name: &str, except: Option<i64>) -> HrResult<()> {
    match tables
        .salary_components
        .find(|c| c.name.eq_ignore_ascii_case(name) && Some(c.id) != except)
    {
        Some(_) => Err(HrError::Duplicate {
            entity: "salary component",
            field: "name",
            value: name.to_string(),
        }),
        None => Ok(()),
    }
}

fn structure_view(tables: &Tables, structure: SalaryStructure) -> HrResult<StructureView> {
    let component = tables.salary_components.require(structure.component_id)?;
    Ok(StructureView {
        component_name: component.name.clone(),
        component_type: component.component_type,
        structure,
    })
}

fn calculate_employee_payroll(
    tables: &mut Tables,
    policy: &PayrollPolicy,
    employee_id: i64,
    run: &PayrollRun,
) -> HrResult<Option<Payslip>> {
    let employee = tables.employees.require(employee_id)?;
    if !employee.is_active() {
        return Ok(None);
    }
    let (month_start, month_end) = month_bounds(run.year, run.month)
        .ok_or_else(|| HrError::validation("month", format!("{} is not a month", run.month)))?;

    let lines = tables
        .salary_structures
        .iter()
        .filter(|s| s.employee_id == employee_id && s.is_effective_on(month_start))
        .map(|s| {
            let component = tables.salary_components.require(s.component_id)?;
            Ok(StructureLine {
                name: component.name.clone(),
                component_type: component.component_type,
                amount: s.amount,
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    if lines.is_empty() {
        return Ok(None);
    }

    let mut paid_leave_days = Decimal::ZERO;
    let mut unpaid_leave_days = Decimal::ZERO;
    for request in tables
        .leave_requests
        .iter()
        .filter(|r| r.employee_id == employee_id && r.status == LeaveRequestStatus::Approved)
    {
        let days = overlap_days(request.start_date, request.end_date, month_start, month_end);
        if days == 0 {
            continue;
        }
        let Some(leave_type) = tables.leave_types.get(request.leave_type_id) else {
            warn!(request_id = request.id, "Approved leave references a missing leave type");
            continue;
        };
        if leave_type.is_paid {
            paid_leave_days += Decimal::from(days);
        } else {
            unpaid_leave_days += Decimal::from(days);
        }
    }

    let calculation = calculate_payslip(&PayslipInput {
        year: run.year,
        month: run.month,
        lines: &lines,
        paid_leave_days,
        unpaid_leave_days,
        policy,
    })?;

    tables
        .payslips
        .retain(|p| !(p.payroll_run_id == run.id && p.employee_id == employee_id));
    let payslip = tables
        .payslips
        .insert_with(|id| Payslip {
            id,
            employee_id,
            payroll_run_id: run.id,
            gross_earnings: calculation.gross_earnings,
            total_deductions: calculation.total_deductions,
            net_salary: calculation.net_salary,
            salary_details: calculation.salary_details,
            total_working_days_in_month: calculation.total_working_days_in_month,
            days_present: calculation.days_present,
            paid_leave_days: calculation.paid_leave_days,
            unpaid_leave_days: calculation.unpaid_leave_days,
            loss_of_pay_deduction: calculation.loss_of_pay_deduction,
            generated_at: Utc::now(),
            audit_trace: calculation.audit_trace,
        })
        .clone();
    Ok(Some(payslip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentStatus, LeaveTypeName};
    use crate::services::employee::EmployeeProfileUpdate;
    use crate::services::leave::{LeaveApplication, LeaveDecision};
    use crate::services::test_support::{date, dec, fixture, Fixture};

    fn component(fx: &Fixture, name: &str, component_type: SalaryComponentType) -> i64 {
        fx.payroll
            .create_component(NewSalaryComponent {
                name: name.to_string(),
                component_type,
                description: None,
                is_taxable: true,
                calculation_formula: None,
            })
            .unwrap()
            .id
    }

    fn structure(fx: &Fixture, component_id: i64, amount: &str) {
        fx.payroll
            .add_structure(NewSalaryStructure {
                employee_id: fx.employee_id,
                component_id,
                amount: dec(amount),
                effective_from: date(2026, 1, 1),
                effective_to: None,
            })
            .unwrap();
    }

    /// BASIC 70000, HRA 30000, Professional Tax 200, Bonus 5000.
    fn standard_structure(fx: &Fixture) {
        let basic = component(fx, "Basic", SalaryComponentType::EarningFixed);
        let hra = component(fx, "House Rent Allowance", SalaryComponentType::EarningFixed);
        let tax = component(fx, "Professional Tax", SalaryComponentType::DeductionFixed);
        let bonus = component(fx, "Bonus", SalaryComponentType::EarningVariable);
        structure(fx, basic, "70000");
        structure(fx, hra, "30000");
        structure(fx, tax, "200");
        structure(fx, bonus, "5000");
    }

    fn approved_unpaid_leave(fx: &Fixture, start: NaiveDate, end: NaiveDate) {
        let unpaid = fx
            .leave
            .list_leave_types()
            .into_iter()
            .find(|t| t.name == LeaveTypeName::Unpaid)
            .unwrap()
            .id;
        let request = fx
            .leave
            .apply_for_leave(LeaveApplication {
                employee_id: fx.employee_id,
                leave_type_id: unpaid,
                start_date: start,
                end_date: end,
                reason: None,
            })
            .unwrap();
        fx.leave
            .action_leave_request(
                request.id,
                LeaveDecision {
                    status: LeaveRequestStatus::Approved,
                    remarks: None,
                    actor_user_id: fx.manager_user_id,
                },
            )
            .unwrap();
    }

    fn draft_run(fx: &Fixture, month: u32, year: i32) -> PayrollRun {
        fx.store.write(|tables| {
            tables
                .payroll_runs
                .insert_with(|id| PayrollRun {
                    id,
                    month,
                    year,
                    status: PayrollRunStatus::Draft,
                    run_date: Utc::now(),
                    processed_by_user_id: None,
                    notes: None,
                })
                .clone()
        })
    }

    // ==========================================================================
    // PR-001: full payslip with loss of pay and provident fund
    // ==========================================================================
    #[test]
    fn test_pr_001_payslip_with_unpaid_leave() {
        let fx = fixture();
        standard_structure(&fx);
        // Mon 9 and Tue 10 March 2026
        approved_unpaid_leave(&fx, date(2026, 3, 9), date(2026, 3, 10));
        let run = draft_run(&fx, 3, 2026);

        let payslip = fx
            .payroll
            .calculate_employee_payroll(fx.employee_id, run.id)
            .unwrap()
            .unwrap();

        assert_eq!(payslip.total_working_days_in_month, 31);
        assert_eq!(payslip.unpaid_leave_days, dec("2"));
        assert_eq!(payslip.days_present, dec("29"));
        assert_eq!(payslip.loss_of_pay_deduction, dec("4516.13"));
        assert_eq!(payslip.gross_earnings, dec("105000.00"));
        assert_eq!(payslip.total_deductions, dec("6516.13"));
        assert_eq!(payslip.net_salary, dec("98483.87"));

        let names: Vec<_> = payslip
            .salary_details
            .deductions
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["Professional Tax", "Loss of Pay", "Provident Fund (PF)"]);
    }

    #[test]
    fn test_leave_overlapping_month_boundary_counts_inside_days_only() {
        let fx = fixture();
        standard_structure(&fx);
        // Fri 27 Feb .. Tue 3 Mar: three days fall in March
        approved_unpaid_leave(&fx, date(2026, 2, 27), date(2026, 3, 3));
        let run = draft_run(&fx, 3, 2026);

        let payslip = fx
            .payroll
            .calculate_employee_payroll(fx.employee_id, run.id)
            .unwrap()
            .unwrap();
        assert_eq!(payslip.unpaid_leave_days, dec("3"));
    }

    #[test]
    fn test_no_structure_or_inactive_yields_no_payslip() {
        let fx = fixture();
        let run = draft_run(&fx, 3, 2026);
        assert!(fx
            .payroll
            .calculate_employee_payroll(fx.employee_id, run.id)
            .unwrap()
            .is_none());
    }

    // ==========================================================================
    // PR-002: run orchestration notes and statuses
    // ==========================================================================
    #[test]
    fn test_pr_002_process_run() {
        let fx = fixture();
        standard_structure(&fx);
        let run = draft_run(&fx, 4, 2026);

        let processed = fx.payroll.process_payroll_run(run.id, None).unwrap();
        assert_eq!(processed.status, PayrollRunStatus::PendingApproval);
        assert_eq!(processed.notes.as_deref(), Some("1 payslips generated."));

        let err = fx.payroll.process_payroll_run(run.id, None).unwrap_err();
        assert!(matches!(err, HrError::BusinessRule { .. }));

        // Rejecting reopens processing; payslips are regenerated, not duplicated.
        fx.payroll
            .update_run_status(
                run.id,
                RunStatusUpdate {
                    status: PayrollRunStatus::Rejected,
                    notes: None,
                    actor_user_id: None,
                },
            )
            .unwrap();
        fx.payroll.process_payroll_run(run.id, None).unwrap();
        assert_eq!(fx.payroll.list_payslips_for_run(run.id).unwrap().len(), 1);
    }

    #[test]
    fn test_reprocessing_drops_payslips_of_employees_no_longer_paid() {
        let fx = fixture();
        standard_structure(&fx);
        let run = draft_run(&fx, 4, 2026);

        fx.payroll.process_payroll_run(run.id, None).unwrap();
        let earlier = fx.payroll.list_payslips_for_run(run.id).unwrap();
        assert_eq!(earlier.len(), 1);

        fx.payroll
            .update_run_status(
                run.id,
                RunStatusUpdate {
                    status: PayrollRunStatus::Rejected,
                    notes: None,
                    actor_user_id: None,
                },
            )
            .unwrap();
        fx.employees
            .update_employee_profile(
                fx.employee_id,
                EmployeeProfileUpdate {
                    employment_status: Some(EmploymentStatus::Terminated),
                    termination_date: Some(date(2026, 3, 31)),
                    ..EmployeeProfileUpdate::default()
                },
            )
            .unwrap();

        let reprocessed = fx.payroll.process_payroll_run(run.id, None).unwrap();
        assert_eq!(reprocessed.status, PayrollRunStatus::Draft);
        assert!(fx.payroll.list_payslips_for_run(run.id).unwrap().is_empty());
        assert!(matches!(
            fx.payroll.get_payslip(earlier[0].id).unwrap_err(),
            HrError::NotFound { entity: "payslip", .. }
        ));
    }

    #[test]
    fn test_empty_target_set_leaves_run_in_draft() {
        let fx = fixture();
        let run = draft_run(&fx, 4, 2026);

        let processed = fx.payroll.process_payroll_run(run.id, Some(vec![999])).unwrap();
        assert_eq!(processed.status, PayrollRunStatus::Draft);
        assert_eq!(
            processed.notes.as_deref(),
            Some("No employees found/eligible for processing.")
        );

        let processed = fx.payroll.process_payroll_run(run.id, None).unwrap();
        assert_eq!(processed.status, PayrollRunStatus::Draft);
        assert!(processed.notes.unwrap().starts_with("No payslips were generated"));
    }

    #[test]
    fn test_run_transitions_are_validated() {
        let fx = fixture();
        let run = draft_run(&fx, 5, 2026);
        let err = fx
            .payroll
            .update_run_status(
                run.id,
                RunStatusUpdate {
                    status: PayrollRunStatus::Paid,
                    notes: None,
                    actor_user_id: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot move payroll run from 'draft' to 'paid'");
    }

    // ==========================================================================
    // PR-003: one processing per month at a time
    // ==========================================================================
    #[test]
    fn test_pr_003_in_flight_marker() {
        let fx = fixture();
        let guard = fx.payroll.acquire_in_flight(6, 2026).unwrap();
        let err = fx.payroll.acquire_in_flight(6, 2026).unwrap_err();
        assert!(matches!(err, HrError::PayrollRunInFlight { month: 6, year: 2026 }));
        assert!(fx.payroll.acquire_in_flight(7, 2026).is_ok());

        drop(guard);
        assert!(fx.payroll.acquire_in_flight(6, 2026).is_ok());
    }

    #[tokio::test]
    async fn test_start_run_processes_in_background() {
        let fx = fixture();
        standard_structure(&fx);

        let started = fx
            .payroll
            .start_payroll_run(StartPayrollRun {
                month: 3,
                year: 2026,
                employee_ids: None,
                actor_user_id: Some(fx.manager_user_id),
            })
            .unwrap();
        assert_eq!(started.run.status, PayrollRunStatus::Draft);
        started.task.await.unwrap();

        let run = fx.payroll.get_run(started.run.id).unwrap();
        assert_eq!(run.status, PayrollRunStatus::PendingApproval);
        assert_eq!(run.processed_by_user_id, Some(fx.manager_user_id));

        // Past draft: the month cannot be restarted.
        let err = fx
            .payroll
            .start_payroll_run(StartPayrollRun {
                month: 3,
                year: 2026,
                employee_ids: None,
                actor_user_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::BusinessRule { .. }));

        let err = fx
            .payroll
            .start_payroll_run(StartPayrollRun {
                month: 13,
                year: 2026,
                employee_ids: None,
                actor_user_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_start_run_conflicts_while_in_flight() {
        let fx = fixture();
        let _held = fx.payroll.acquire_in_flight(8, 2026).unwrap();
        let err = fx
            .payroll
            .start_payroll_run(StartPayrollRun {
                month: 8,
                year: 2026,
                employee_ids: None,
                actor_user_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::PayrollRunInFlight { .. }));
        assert!(fx.payroll.list_runs(Some(2026)).is_empty());
    }

    // ==========================================================================
    // PR-004: bank advice
    // ==========================================================================
    #[test]
    fn test_pr_004_bank_advice() {
        let fx = fixture();
        standard_structure(&fx);
        let run = draft_run(&fx, 3, 2026);
        fx.payroll.process_payroll_run(run.id, None).unwrap();

        let err = fx.payroll.bank_advice(run.id).unwrap_err();
        assert!(matches!(err, HrError::BusinessRule { .. }));

        fx.payroll
            .update_run_status(
                run.id,
                RunStatusUpdate {
                    status: PayrollRunStatus::Approved,
                    notes: None,
                    actor_user_id: Some(fx.manager_user_id),
                },
            )
            .unwrap();

        match fx.payroll.bank_advice(run.id).unwrap() {
            BankAdvice::Csv { filename, content } => {
                assert_eq!(filename, "bank_advice_2026_03.csv");
                let lines: Vec<_> = content.lines().collect();
                assert_eq!(lines.len(), 2);
                assert_eq!(
                    lines[1],
                    format!("{},Asha Rao,001234567890,HDFC0000123,103000.00", fx.employee_id)
                );
            }
            other => panic!("expected CSV, got {other:?}"),
        }
    }

    #[test]
    fn test_structure_validation() {
        let fx = fixture();
        let basic = component(&fx, "Basic", SalaryComponentType::EarningFixed);
        let err = fx
            .payroll
            .add_structure(NewSalaryStructure {
                employee_id: fx.employee_id,
                component_id: basic,
                amount: dec("100"),
                effective_from: date(2026, 2, 1),
                effective_to: Some(date(2026, 1, 31)),
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));

        let err = fx
            .payroll
            .create_component(NewSalaryComponent {
                name: "BASIC".to_string(),
                component_type: SalaryComponentType::EarningFixed,
                description: None,
                is_taxable: true,
                calculation_formula: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Duplicate { .. }));
    }
}
