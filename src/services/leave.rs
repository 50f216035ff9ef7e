//! Leave types, holidays, balances and the leave request lifecycle.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{count_leave_days, LeaveDayCount};
use crate::config::ConfigLoader;
use crate::error::{HrError, HrResult};
use crate::models::{
    Holiday, LeaveBalance, LeaveRequest, LeaveRequestStatus, LeaveType, LeaveTypeName,
};
use crate::store::{HrStore, Tables};

/// Longest leave range accepted, in calendar days.
pub const MAX_LEAVE_SPAN_DAYS: i64 = 5 * 366;

fn default_true() -> bool {
    true
}

/// A new leave category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveType {
    /// Unique category.
    pub name: LeaveTypeName,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Yearly allocation for new balance rows.
    pub default_days_annually: Decimal,
    /// Paid or unpaid.
    #[serde(default = "default_true")]
    pub is_paid: bool,
    /// Whether requests wait for a manager.
    #[serde(default = "default_true")]
    pub requires_approval: bool,
}

/// Partial update of a leave type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeaveTypeUpdate {
    /// New category.
    pub name: Option<LeaveTypeName>,
    /// New description.
    pub description: Option<String>,
    /// New default allocation.
    pub default_days_annually: Option<Decimal>,
    /// New paid flag.
    pub is_paid: Option<bool>,
    /// New approval flag.
    pub requires_approval: Option<bool>,
}

/// A new holiday.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHoliday {
    /// Display name.
    pub name: String,
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Restricted holiday flag.
    #[serde(default)]
    pub is_optional: bool,
    /// Defaults to the organisation's country.
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Partial update of a holiday.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HolidayUpdate {
    /// New name.
    pub name: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New restricted flag.
    pub is_optional: Option<bool>,
    /// New country.
    pub country_code: Option<String>,
}

/// The independent effects of a balance write.
///
/// `set_taken_days` wins over `taken_days_delta`. Taken days never drop
/// below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceChange {
    /// Replace the allocation.
    pub allocated_days_override: Option<Decimal>,
    /// Add to (or subtract from) taken days.
    pub taken_days_delta: Option<Decimal>,
    /// Replace taken days.
    pub set_taken_days: Option<Decimal>,
}

/// A balance row joined with its leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveBalanceView {
    /// The stored row.
    #[serde(flatten)]
    pub balance: LeaveBalance,
    /// Category of the balance.
    pub leave_type_name: LeaveTypeName,
    /// `allocated - taken`.
    pub balance_days: Decimal,
}

/// A leave application submitted by an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveApplication {
    /// Applicant.
    pub employee_id: i64,
    /// Leave category.
    pub leave_type_id: i64,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Free-form reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A manager's decision on a pending request.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveDecision {
    /// `approved` or `rejected`.
    pub status: LeaveRequestStatus,
    /// Remarks shown to the employee.
    #[serde(default)]
    pub remarks: Option<String>,
    /// The deciding user.
    pub actor_user_id: i64,
}

/// Counts of rows created from configuration at start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Leave types inserted.
    pub leave_types: usize,
    /// Holidays inserted.
    pub holidays: usize,
}

/// Leave operations over the shared store.
#[derive(Debug, Clone)]
pub struct LeaveService {
    store: HrStore,
    config: Arc<ConfigLoader>,
}

impl LeaveService {
    /// Creates the service.
    pub fn new(store: HrStore, config: Arc<ConfigLoader>) -> Self {
        Self { store, config }
    }

    fn country_or_default(&self, country_code: Option<&str>) -> String {
        country_code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.config.organisation().country_code.as_str())
            .to_uppercase()
    }

    /// Inserts configured leave types and holidays that are not yet present.
    pub fn seed_from_config(&self) -> SeedSummary {
        self.store.write(|tables| {
            let mut summary = SeedSummary::default();

            for seed in self.config.leave_types() {
                if tables.leave_types.find(|t| t.name == seed.name).is_some() {
                    continue;
                }
                tables.leave_types.insert_with(|id| LeaveType {
                    id,
                    name: seed.name,
                    description: seed.description.clone(),
                    default_days_annually: seed.default_days_annually,
                    is_paid: seed.is_paid,
                    requires_approval: seed.requires_approval,
                });
                summary.leave_types += 1;
            }

            for (seed, country) in self.config.holidays() {
                let country = country.to_uppercase();
                let exists = tables
                    .holidays
                    .find(|h| h.date == seed.date && h.country_code == country && h.name == seed.name)
                    .is_some();
                if exists {
                    continue;
                }
                tables.holidays.insert_with(|id| Holiday {
                    id,
                    name: seed.name.clone(),
                    date: seed.date,
                    is_optional: seed.is_optional,
                    country_code: country.clone(),
                });
                summary.holidays += 1;
            }

            info!(
                leave_types = summary.leave_types,
                holidays = summary.holidays,
                "Seeded leave configuration"
            );
            summary
        })
    }

    // ------------------------------------------------------------------
    // Leave types
    // ------------------------------------------------------------------

    /// Creates a leave type with a unique name.
    pub fn create_leave_type(&self, new: NewLeaveType) -> HrResult<LeaveType> {
        check_allocation(new.default_days_annually)?;
        self.store.write(|tables| {
            ensure_unique_leave_type(tables, new.name, None)?;
            Ok(tables
                .leave_types
                .insert_with(|id| LeaveType {
                    id,
                    name: new.name,
                    description: new.description,
                    default_days_annually: new.default_days_annually,
                    is_paid: new.is_paid,
                    requires_approval: new.requires_approval,
                })
                .clone())
        })
    }

    /// Lists every leave type.
    pub fn list_leave_types(&self) -> Vec<LeaveType> {
        self.store.read(|tables| tables.leave_types.iter().cloned().collect())
    }

    /// Fetches one leave type.
    pub fn get_leave_type(&self, id: i64) -> HrResult<LeaveType> {
        self.store.read(|tables| tables.leave_types.require(id).cloned())
    }

    /// Applies a partial update to a leave type.
    pub fn update_leave_type(&self, id: i64, update: LeaveTypeUpdate) -> HrResult<LeaveType> {
        if let Some(days) = update.default_days_annually {
            check_allocation(days)?;
        }
        self.store.write(|tables| {
            tables.leave_types.require(id)?;
            if let Some(name) = update.name {
                ensure_unique_leave_type(tables, name, Some(id))?;
            }

            let leave_type = tables.leave_types.require_mut(id)?;
            if let Some(name) = update.name {
                leave_type.name = name;
            }
            if let Some(description) = update.description {
                leave_type.description = Some(description);
            }
            if let Some(days) = update.default_days_annually {
                leave_type.default_days_annually = days;
            }
            if let Some(is_paid) = update.is_paid {
                leave_type.is_paid = is_paid;
            }
            if let Some(requires_approval) = update.requires_approval {
                leave_type.requires_approval = requires_approval;
            }
            Ok(leave_type.clone())
        })
    }

    /// Deletes a leave type that no balance or request refers to.
    pub fn delete_leave_type(&self, id: i64) -> HrResult<()> {
        self.store.write(|tables| {
            let name = tables.leave_types.require(id)?.name;
            let in_use = tables.leave_balances.find(|b| b.leave_type_id == id).is_some()
                || tables.leave_requests.find(|r| r.leave_type_id == id).is_some();
            if in_use {
                return Err(HrError::rule(format!(
                    "Leave type {name} is referenced by balances or requests and cannot be deleted."
                )));
            }
            tables.leave_types.remove(id);
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Holidays
    // ------------------------------------------------------------------

    /// Creates a holiday; the country defaults to the organisation's.
    pub fn create_holiday(&self, new: NewHoliday) -> HrResult<Holiday> {
        let name = required_text("name", &new.name)?;
        let country = self.country_or_default(new.country_code.as_deref());
        self.store.write(|tables| {
            ensure_unique_holiday(tables, &name, new.date, &country, None)?;
            Ok(tables
                .holidays
                .insert_with(|id| Holiday {
                    id,
                    name,
                    date: new.date,
                    is_optional: new.is_optional,
                    country_code: country,
                })
                .clone())
        })
    }

    /// Lists holidays of one year and country, in date order.
    pub fn list_holidays(&self, year: i32, country_code: Option<&str>) -> Vec<Holiday> {
        let country = self.country_or_default(country_code);
        let mut holidays = self.store.read(|tables| {
            tables
                .holidays
                .filter_cloned(|h| h.date.year() == year && h.country_code == country)
        });
        holidays.sort_by_key(|h| h.date);
        holidays
    }

    /// Fetches one holiday.
    pub fn get_holiday(&self, id: i64) -> HrResult<Holiday> {
        self.store.read(|tables| tables.holidays.require(id).cloned())
    }

    /// Applies a partial update to a holiday.
    pub fn update_holiday(&self, id: i64, update: HolidayUpdate) -> HrResult<Holiday> {
        let name = update
            .name
            .as_deref()
            .map(|n| required_text("name", n))
            .transpose()?;
        let country = update
            .country_code
            .as_deref()
            .map(|c| self.country_or_default(Some(c)));

        self.store.write(|tables| {
            let current = tables.holidays.require(id)?.clone();
            let name = name.unwrap_or(current.name);
            let date = update.date.unwrap_or(current.date);
            let country = country.unwrap_or(current.country_code);
            ensure_unique_holiday(tables, &name, date, &country, Some(id))?;

            let holiday = tables.holidays.require_mut(id)?;
            holiday.name = name;
            holiday.date = date;
            holiday.country_code = country;
            if let Some(is_optional) = update.is_optional {
                holiday.is_optional = is_optional;
            }
            Ok(holiday.clone())
        })
    }

    /// Deletes a holiday.
    pub fn delete_holiday(&self, id: i64) -> HrResult<()> {
        self.store.write(|tables| {
            tables.holidays.require(id)?;
            tables.holidays.remove(id);
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Calculator and balances
    // ------------------------------------------------------------------

    /// Counts chargeable leave days in `[start, end]` for a country.
    ///
    /// Weekends are skipped unless `include_weekends`; holidays of the
    /// country are always skipped. Zero when `start > end`.
    pub fn calculate_leave_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        include_weekends: bool,
        country_code: Option<&str>,
    ) -> LeaveDayCount {
        let country = self.country_or_default(country_code);
        self.store
            .read(|tables| days_for(tables, start, end, include_weekends, &country))
    }

    /// Returns true if the employee can take `days` of the leave type in
    /// `year`. Without a balance row the default allocation is used.
    pub fn check_leave_balance(
        &self,
        employee_id: i64,
        leave_type_id: i64,
        days: Decimal,
        year: i32,
    ) -> bool {
        self.store
            .read(|tables| has_balance(tables, employee_id, leave_type_id, days, year))
    }

    /// Creates missing balance rows for every leave type and returns all of
    /// the employee's balances for the year.
    pub fn initialize_employee_balances_for_year(
        &self,
        employee_id: i64,
        year: i32,
    ) -> HrResult<Vec<LeaveBalanceView>> {
        self.store.write(|tables| {
            tables.employees.require(employee_id)?;
            let type_ids: Vec<i64> = tables.leave_types.iter().map(|t| t.id).collect();
            for leave_type_id in type_ids {
                if find_balance(tables, employee_id, leave_type_id, year).is_none() {
                    upsert_balance(tables, employee_id, leave_type_id, year, BalanceChange::default())?;
                }
            }
            Ok(balance_views(tables, employee_id, year))
        })
    }

    /// Creates or updates a balance row.
    pub fn create_or_update_leave_balance(
        &self,
        employee_id: i64,
        leave_type_id: i64,
        year: i32,
        change: BalanceChange,
    ) -> HrResult<LeaveBalance> {
        self.store.write(|tables| {
            tables.employees.require(employee_id)?;
            upsert_balance(tables, employee_id, leave_type_id, year, change)
        })
    }

    /// Adds `days` to the allocation, creating the row first if needed.
    pub fn accrue_monthly_leave(
        &self,
        employee_id: i64,
        leave_type_id: i64,
        days: Decimal,
        year: i32,
    ) -> HrResult<LeaveBalance> {
        if days <= Decimal::ZERO {
            return Err(HrError::validation("days", "accrual must be positive"));
        }
        self.store.write(|tables| {
            tables.employees.require(employee_id)?;
            let current = upsert_balance(
                tables,
                employee_id,
                leave_type_id,
                year,
                BalanceChange::default(),
            )?;
            upsert_balance(
                tables,
                employee_id,
                leave_type_id,
                year,
                BalanceChange {
                    allocated_days_override: Some(current.allocated_days + days),
                    ..BalanceChange::default()
                },
            )
        })
    }

    /// Lists an employee's balances for a year.
    pub fn list_balances(&self, employee_id: i64, year: i32) -> HrResult<Vec<LeaveBalanceView>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            Ok(balance_views(tables, employee_id, year))
        })
    }

    /// Administrative correction with absolute values.
    pub fn adjust_balance(
        &self,
        employee_id: i64,
        leave_type_id: i64,
        year: i32,
        allocated_days: Option<Decimal>,
        taken_days: Option<Decimal>,
    ) -> HrResult<LeaveBalanceView> {
        for (field, value) in [("allocated_days", allocated_days), ("taken_days", taken_days)] {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(HrError::validation(field, "must not be negative"));
            }
        }
        self.store.write(|tables| {
            tables.employees.require(employee_id)?;
            let balance = upsert_balance(
                tables,
                employee_id,
                leave_type_id,
                year,
                BalanceChange {
                    allocated_days_override: allocated_days,
                    taken_days_delta: None,
                    set_taken_days: taken_days,
                },
            )?;
            let leave_type_name = tables.leave_types.require(leave_type_id)?.name;
            info!(employee_id, leave_type_id, year, "Leave balance adjusted");
            Ok(view(balance, leave_type_name))
        })
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Submits a leave request.
    ///
    /// Days are counted with the organisation's holiday calendar. Paid leave
    /// must fit in the balance of the start year. Requests of a type that
    /// needs no approval are approved at once and charged immediately.
    pub fn apply_for_leave(&self, application: LeaveApplication) -> HrResult<LeaveRequest> {
        check_leave_range(application.start_date, application.end_date)?;
        let country = self.country_or_default(None);

        self.store.write(|tables| {
            tables.employees.require(application.employee_id)?;
            let leave_type = tables.leave_types.require(application.leave_type_id)?.clone();

            let count = days_for(
                tables,
                application.start_date,
                application.end_date,
                false,
                &country,
            );
            if count.days <= Decimal::ZERO {
                return Err(HrError::validation(
                    "start_date",
                    "Calculated leave days must be positive.",
                ));
            }

            let year = application.start_date.year();
            if leave_type.is_paid
                && !has_balance(tables, application.employee_id, leave_type.id, count.days, year)
            {
                return Err(HrError::rule(format!(
                    "Insufficient leave balance for {}.",
                    leave_type.name
                )));
            }

            let status = if leave_type.requires_approval {
                LeaveRequestStatus::Pending
            } else {
                LeaveRequestStatus::Approved
            };

            if status == LeaveRequestStatus::Approved && leave_type.is_paid {
                upsert_balance(
                    tables,
                    application.employee_id,
                    leave_type.id,
                    year,
                    BalanceChange {
                        taken_days_delta: Some(count.days),
                        ..BalanceChange::default()
                    },
                )?;
            }

            let request = tables
                .leave_requests
                .insert_with(|id| LeaveRequest {
                    id,
                    employee_id: application.employee_id,
                    leave_type_id: leave_type.id,
                    start_date: application.start_date,
                    end_date: application.end_date,
                    reason: application.reason,
                    status,
                    number_of_days: count.days,
                    applied_on: Utc::now(),
                    manager_remarks: None,
                    actioned_by_user_id: None,
                    actioned_on: None,
                })
                .clone();

            info!(
                request_id = request.id,
                employee_id = request.employee_id,
                days = %request.number_of_days,
                status = %request.status,
                "Leave request submitted"
            );
            Ok(request)
        })
    }

    /// Approves or rejects a pending request.
    pub fn action_leave_request(&self, id: i64, decision: LeaveDecision) -> HrResult<LeaveRequest> {
        if !matches!(
            decision.status,
            LeaveRequestStatus::Approved | LeaveRequestStatus::Rejected
        ) {
            return Err(HrError::validation(
                "status",
                "Action must be 'approved' or 'rejected'.",
            ));
        }

        self.store.write(|tables| {
            let request = tables.leave_requests.require(id)?.clone();
            if !request.is_pending() {
                return Err(HrError::rule(format!(
                    "Leave request is already {}.",
                    request.status
                )));
            }
            tables.users.require(decision.actor_user_id)?;
            let is_paid = tables.leave_types.require(request.leave_type_id)?.is_paid;

            if decision.status == LeaveRequestStatus::Approved && is_paid {
                upsert_balance(
                    tables,
                    request.employee_id,
                    request.leave_type_id,
                    request.start_date.year(),
                    BalanceChange {
                        taken_days_delta: Some(request.number_of_days),
                        ..BalanceChange::default()
                    },
                )?;
            }

            let request = tables.leave_requests.require_mut(id)?;
            request.status = decision.status;
            request.manager_remarks = decision.remarks;
            request.actioned_by_user_id = Some(decision.actor_user_id);
            request.actioned_on = Some(Utc::now());

            info!(
                request_id = id,
                status = %request.status,
                actor_user_id = decision.actor_user_id,
                "Leave request actioned"
            );
            Ok(request.clone())
        })
    }

    /// Cancels a pending request on behalf of the employee who made it.
    pub fn cancel_leave_request(&self, id: i64, employee_id: i64) -> HrResult<LeaveRequest> {
        self.store.write(|tables| {
            let request = tables.leave_requests.require(id)?;
            if request.employee_id != employee_id {
                warn!(request_id = id, employee_id, "Cancellation by non-owner refused");
                return Err(HrError::Forbidden {
                    message: "Not authorized to cancel this leave request.".to_string(),
                });
            }
            if !request.is_pending() {
                return Err(HrError::rule(format!(
                    "Cannot cancel. Request status: {}.",
                    request.status
                )));
            }
            let actor_user_id = tables.employees.require(employee_id)?.user_id;

            let request = tables.leave_requests.require_mut(id)?;
            request.status = LeaveRequestStatus::Cancelled;
            request.manager_remarks = Some("Cancelled by employee".to_string());
            request.actioned_by_user_id = Some(actor_user_id);
            request.actioned_on = Some(Utc::now());
            Ok(request.clone())
        })
    }

    /// Fetches one request.
    pub fn get_request(&self, id: i64) -> HrResult<LeaveRequest> {
        self.store.read(|tables| tables.leave_requests.require(id).cloned())
    }

    /// Lists an employee's requests, newest first.
    pub fn list_requests_for_employee(
        &self,
        employee_id: i64,
        status: Option<LeaveRequestStatus>,
    ) -> HrResult<Vec<LeaveRequest>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            let mut requests = tables.leave_requests.filter_cloned(|r| {
                r.employee_id == employee_id && status.is_none_or(|s| r.status == s)
            });
            requests.sort_by(|a, b| b.applied_on.cmp(&a.applied_on).then(b.id.cmp(&a.id)));
            Ok(requests)
        })
    }

    /// Lists requests of a manager's direct reports.
    pub fn list_team_requests(
        &self,
        manager_id: i64,
        status: Option<LeaveRequestStatus>,
    ) -> HrResult<Vec<LeaveRequest>> {
        self.store.read(|tables| {
            tables.employees.require(manager_id)?;
            let team: BTreeSet<i64> = tables
                .employees
                .iter()
                .filter(|e| e.manager_id == Some(manager_id))
                .map(|e| e.id)
                .collect();
            Ok(tables.leave_requests.filter_cloned(|r| {
                team.contains(&r.employee_id) && status.is_none_or(|s| r.status == s)
            }))
        })
    }
}

/// Rejects reversed ranges and ranges longer than [`MAX_LEAVE_SPAN_DAYS`].
pub fn check_leave_range(start: NaiveDate, end: NaiveDate) -> HrResult<()> {
    if start > end {
        return Err(HrError::validation(
            "end_date",
            "Start date cannot be after end date.",
        ));
    }
    if (end - start).num_days() >= MAX_LEAVE_SPAN_DAYS {
        return Err(HrError::validation(
            "end_date",
            format!("Leave range cannot exceed {MAX_LEAVE_SPAN_DAYS} days."),
        ));
    }
    Ok(())
}

fn check_allocation(days: Decimal) -> HrResult<()> {
    if days < Decimal::ZERO {
        return Err(HrError::validation(
            "default_days_annually",
            "must not be negative",
        ));
    }
    Ok(())
}

fn required_text(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn ensure_unique_leave_type(tables: &Tables, name: LeaveTypeName, except: Option<i64>) -> HrResult<()> {
    match tables.leave_types.find(|t| t.name == name && Some(t.id) != except) {
        Some(_) => Err(HrError::Duplicate {
            entity: "leave type",
            field: "name",
            value: name.to_string(),
        }),
        None => Ok(()),
    }
}

fn ensure_unique_holiday(
    tables: &Tables,
    name: &str,
    date: NaiveDate,
    country: &str,
    except: Option<i64>,
) -> HrResult<()> {
    let clash = tables.holidays.find(|h| {
        h.date == date && h.country_code == country && h.name == name && Some(h.id) != except
    });
    match clash {
        Some(_) => Err(HrError::Duplicate {
            entity: "holiday",
            field: "date",
            value: format!("{date} {country} {name}"),
        }),
        None => Ok(()),
    }
}

fn days_for(
    tables: &Tables,
    start: NaiveDate,
    end: NaiveDate,
    include_weekends: bool,
    country: &str,
) -> LeaveDayCount {
    let holidays: BTreeSet<NaiveDate> = tables
        .holidays
        .iter()
        .filter(|h| h.country_code == country && h.date >= start && h.date <= end)
        .map(|h| h.date)
        .collect();
    count_leave_days(start, end, include_weekends, &holidays)
}

fn find_balance(tables: &Tables, employee_id: i64, leave_type_id: i64, year: i32) -> Option<&LeaveBalance> {
    tables.leave_balances.find(|b| {
        b.employee_id == employee_id && b.leave_type_id == leave_type_id && b.year == year
    })
}

fn has_balance(
    tables: &Tables,
    employee_id: i64,
    leave_type_id: i64,
    days: Decimal,
    year: i32,
) -> bool {
    let Some(leave_type) = tables.leave_types.get(leave_type_id) else {
        return false;
    };
    let available = match find_balance(tables, employee_id, leave_type_id, year) {
        Some(balance) => balance.balance_days(),
        None => leave_type.default_days_annually,
    };
    available >= days
}

/// Creates the row (allocation from the type default unless overridden) or
/// applies the change to the existing one.
fn upsert_balance(
    tables: &mut Tables,
    employee_id: i64,
    leave_type_id: i64,
    year: i32,
    change: BalanceChange,
) -> HrResult<LeaveBalance> {
    let default_days = tables.leave_types.require(leave_type_id)?.default_days_annually;
    let existing = find_balance(tables, employee_id, leave_type_id, year).map(|b| b.id);

    let balance = match existing {
        Some(id) => {
            let balance = tables.leave_balances.require_mut(id)?;
            if let Some(allocated) = change.allocated_days_override {
                balance.allocated_days = allocated;
            }
            if let Some(taken) = change.set_taken_days {
                balance.taken_days = taken;
            } else if let Some(delta) = change.taken_days_delta {
                balance.taken_days += delta;
            }
            balance.taken_days = balance.taken_days.max(Decimal::ZERO);
            balance.clone()
        }
        None => {
            let taken = change
                .set_taken_days
                .or(change.taken_days_delta)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);
            tables
                .leave_balances
                .insert_with(|id| LeaveBalance {
                    id,
                    employee_id,
                    leave_type_id,
                    year,
                    allocated_days: change.allocated_days_override.unwrap_or(default_days),
                    taken_days: taken,
                })
                .clone()
        }
    };
    Ok(balance)
}

fn view(balance: LeaveBalance, leave_type_name: LeaveTypeName) -> LeaveBalanceView {
    let balance_days = balance.balance_days();
    LeaveBalanceView {
        balance,
        leave_type_name,
        balance_days,
    }
}

fn balance_views(tables: &Tables, employee_id: i64, year: i32) -> Vec<LeaveBalanceView> {
    tables
        .leave_balances
        .iter()
        .filter(|b| b.employee_id == employee_id && b.year == year)
        .filter_map(|b| {
            let name = tables.leave_types.get(b.leave_type_id)?.name;
            Some(view(b.clone(), name))
        })
        .collect()
}
