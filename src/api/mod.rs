//! HTTP API module for the HR engine.
//!
//! This module exposes the leave, payroll, workflow, employee and
//! performance services as JSON endpoints under `/api/v1`.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::*;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
