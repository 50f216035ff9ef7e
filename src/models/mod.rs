//! Core data models for the HR engine.
//!
//! This module contains the records persisted by the store and the closed
//! status enumerations that drive the leave, payroll, workflow and review
//! state machines.

/// Declares a closed, snake_case-serialised enumeration with `as_str`,
/// `Display` and `FromStr` implementations.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire representation of the variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

mod audit;
mod employee;
mod leave;
mod payroll;
mod performance;
mod workflow;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use employee::{
    Department, DocumentType, EmployeeDocument, EmployeeProfile, EmploymentStatus, User, UserRole,
};
pub use leave::{Holiday, LeaveBalance, LeaveRequest, LeaveRequestStatus, LeaveType, LeaveTypeName};
pub use payroll::{
    PayrollRun, PayrollRunStatus, Payslip, PayslipLine, SalaryComponent, SalaryComponentType,
    SalaryDetails, SalaryStructure,
};
pub use performance::{
    AppraisalCycle, AppraisalCycleStatus, Goal, GoalStatus, PerformanceReview, ReviewStatus,
};
pub use workflow::{
    EmployeeWorkflow, EmployeeWorkflowStep, StepStatus, WorkflowStatus, WorkflowStepTemplate,
    WorkflowTemplate, WorkflowType,
};
