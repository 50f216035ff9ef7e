//! Salary setup, payroll runs, payslips and bank advice.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

use crate::api::request::{StructureQuery, YearQuery};
use crate::api::state::AppState;
use crate::services::{
    BankAdvice, NewSalaryComponent, NewSalaryStructure, RunStatusUpdate, SalaryComponentUpdate,
    SalaryStructureUpdate, StartPayrollRun,
};

use super::{failure, no_content, read_body, respond, start};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/payroll/components", post(create_component).get(list_components))
        .route(
            "/payroll/components/:id",
            get(get_component).put(update_component),
        )
        .route("/payroll/structures", post(add_structure))
        .route(
            "/payroll/structures/employee/:employee_id",
            get(list_structures),
        )
        .route(
            "/payroll/structures/:id",
            put(update_structure).delete(delete_structure),
        )
        .route("/payroll/runs", post(start_run).get(list_runs))
        .route("/payroll/runs/:id", get(get_run))
        .route("/payroll/runs/:id/status", put(update_run_status))
        .route("/payroll/runs/:id/payslips", get(run_payslips))
        .route("/payroll/runs/:id/bank-advice", get(bank_advice))
        .route("/payroll/payslips/employee/:employee_id", get(employee_payslips))
        .route("/payroll/payslips/:id", get(get_payslip))
}

async fn create_component(
    State(state): State<AppState>,
    payload: Result<Json<NewSalaryComponent>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_salary_component");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().payroll.create_component(new),
    )
}

async fn list_components(State(state): State<AppState>) -> Response {
    let correlation_id = start("list_salary_components");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().payroll.list_components()),
    )
}

async fn get_component(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_salary_component");
    respond(correlation_id, StatusCode::OK, state.services().payroll.get_component(id))
}

async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<SalaryComponentUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_salary_component");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().payroll.update_component(id, update),
    )
}

async fn add_structure(
    State(state): State<AppState>,
    payload: Result<Json<NewSalaryStructure>, JsonRejection>,
) -> Response {
    let correlation_id = start("add_salary_structure");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().payroll.add_structure(new),
    )
}

async fn list_structures(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<StructureQuery>,
) -> Response {
    let correlation_id = start("list_salary_structures");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .payroll
            .list_structures(employee_id, query.effective_on),
    )
}

async fn update_structure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<SalaryStructureUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_salary_structure");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().payroll.update_structure(id, update),
    )
}

async fn delete_structure(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("delete_salary_structure");
    no_content(correlation_id, state.services().payroll.delete_structure(id))
}

/// Accepts the run and processes it in the background; clients poll
/// `GET /payroll/runs/:id` for the outcome.
async fn start_run(
    State(state): State<AppState>,
    payload: Result<Json<StartPayrollRun>, JsonRejection>,
) -> Response {
    let correlation_id = start("start_payroll_run");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let result = state
        .services()
        .payroll
        .start_payroll_run(request)
        .map(|started| started.run);
    respond(correlation_id, StatusCode::ACCEPTED, result)
}

async fn list_runs(State(state): State<AppState>, Query(query): Query<YearQuery>) -> Response {
    let correlation_id = start("list_payroll_runs");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().payroll.list_runs(query.year)),
    )
}

async fn get_run(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_payroll_run");
    respond(correlation_id, StatusCode::OK, state.services().payroll.get_run(id))
}

async fn update_run_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<RunStatusUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_payroll_run_status");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().payroll.update_run_status(id, update),
    )
}

async fn run_payslips(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("list_run_payslips");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().payroll.list_payslips_for_run(id),
    )
}

async fn employee_payslips(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Response {
    let correlation_id = start("list_employee_payslips");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .payroll
            .list_payslips_for_employee(employee_id),
    )
}

async fn get_payslip(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_payslip");
    respond(correlation_id, StatusCode::OK, state.services().payroll.get_payslip(id))
}

async fn bank_advice(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("bank_advice");
    match state.services().payroll.bank_advice(id) {
        Ok(BankAdvice::Csv { filename, content }) => {
            info!(
                correlation_id = %correlation_id,
                run_id = id,
                filename = %filename,
                "Bank advice generated"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                content,
            )
                .into_response()
        }
        Ok(BankAdvice::Empty { message }) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            message,
        )
            .into_response(),
        Err(err) => failure(correlation_id, err),
    }
}
