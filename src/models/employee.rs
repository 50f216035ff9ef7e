//! Employee, user and department records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// The role a user plays in the organisation.
    pub enum UserRole {
        /// Full administrative access.
        Admin => "admin",
        /// Manages a team of employees.
        Manager => "manager",
        /// Regular employee.
        Employee => "employee",
    }
}

string_enum! {
    /// Where an employee is in the employment lifecycle.
    ///
    /// Every change of this status is a potential workflow trigger.
    pub enum EmploymentStatus {
        /// Hired, onboarding not yet complete.
        Onboarding => "onboarding",
        /// Working.
        Active => "active",
        /// Serving a notice period.
        OnNotice => "on_notice",
        /// Left voluntarily.
        Resigned => "resigned",
        /// Employment ended by the organisation.
        Terminated => "terminated",
    }
}

impl Default for EmploymentStatus {
    fn default() -> Self {
        EmploymentStatus::Onboarding
    }
}

string_enum! {
    /// The category of an uploaded employee document.
    pub enum DocumentType {
        /// Identity proof.
        IdProof => "id_proof",
        /// Signed offer letter.
        OfferLetter => "offer_letter",
        /// Employment contract.
        Contract => "contract",
        /// Acknowledgement of a company policy.
        PolicyAcknowledgement => "policy_acknowledgement",
        /// Anything else.
        Other => "other",
    }
}

/// A login identity. Profiles hang off users one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate key.
    pub id: i64,
    /// Unique email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role within the organisation.
    pub role: UserRole,
    /// Whether the account may be used.
    pub is_active: bool,
}

impl User {
    /// Returns "First Last".
    ///
    /// ```
    /// use hr_engine::models::{User, UserRole};
    ///
    /// let user = User {
    ///     id: 1,
    ///     email: "asha@example.com".to_string(),
    ///     first_name: "Asha".to_string(),
    ///     last_name: "Rao".to_string(),
    ///     role: UserRole::Employee,
    ///     is_active: true,
    /// };
    /// assert_eq!(user.full_name(), "Asha Rao");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// An organisational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Surrogate key.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Employment details for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Surrogate key; this is the "employee id" used everywhere else.
    pub id: i64,
    /// The owning user (strict one-to-one).
    pub user_id: i64,
    /// Job title.
    pub job_title: Option<String>,
    /// Contact number.
    pub phone_number: Option<String>,
    /// Current lifecycle status.
    pub employment_status: EmploymentStatus,
    /// First day of employment.
    pub hire_date: Option<NaiveDate>,
    /// Date a resignation was tendered.
    pub resignation_date: Option<NaiveDate>,
    /// Date employment was terminated.
    pub termination_date: Option<NaiveDate>,
    /// Final working day.
    pub last_working_day: Option<NaiveDate>,
    /// Salary account number used for bank advice.
    pub bank_account_number: Option<String>,
    /// Branch code used for bank advice.
    pub bank_ifsc_code: Option<String>,
    /// Owning department.
    pub department_id: Option<i64>,
    /// Reporting manager, itself an employee id.
    pub manager_id: Option<i64>,
}

impl EmployeeProfile {
    /// Returns true when the employee is currently working.
    pub fn is_active(&self) -> bool {
        self.employment_status == EmploymentStatus::Active
    }
}

/// Metadata for a file stored on disk for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDocument {
    /// Surrogate key.
    pub id: i64,
    /// Owning employee.
    pub employee_id: i64,
    /// Document category.
    pub document_type: DocumentType,
    /// The file name as uploaded.
    pub file_name: String,
    /// Where the bytes live.
    pub file_path: String,
    /// Upload timestamp.
    pub upload_date: DateTime<Utc>,
    /// Free-form description.
    pub description: Option<String>,
}
