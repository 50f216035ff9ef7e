//! Leave types, holidays, balances, requests and the day calculator.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

use crate::api::request::{
    AccrualRequest, BalanceAdjustment, BalanceCheckQuery, BalanceCheckResponse,
    CancelLeaveRequest, HolidayQuery, LeaveDaysQuery, LeaveStatusQuery, YearQuery,
};
use crate::api::state::AppState;
use crate::services::{
    check_leave_range, HolidayUpdate, LeaveApplication, LeaveDecision, LeaveTypeUpdate,
    NewHoliday, NewLeaveType,
};

use super::{current_year, failure, no_content, read_body, respond, start};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/leaves/types", post(create_leave_type).get(list_leave_types))
        .route(
            "/leaves/types/:id",
            get(get_leave_type)
                .put(update_leave_type)
                .delete(delete_leave_type),
        )
        .route("/leaves/holidays", post(create_holiday).get(list_holidays))
        .route(
            "/leaves/holidays/:id",
            get(get_holiday).put(update_holiday).delete(delete_holiday),
        )
        .route("/leaves/days", get(calculate_days))
        .route("/leaves/balances/accrue", post(accrue_leave))
        .route("/leaves/balances/:employee_id", get(list_balances))
        .route("/leaves/balances/:employee_id/check", get(check_balance))
        .route(
            "/leaves/balances/:employee_id/initialize",
            post(initialize_balances),
        )
        .route(
            "/leaves/balances/:employee_id/:leave_type_id",
            put(adjust_balance),
        )
        .route("/leaves/requests", post(apply_for_leave))
        .route("/leaves/requests/employee/:employee_id", get(employee_requests))
        .route("/leaves/requests/team/:manager_id", get(team_requests))
        .route("/leaves/requests/:id", get(get_request))
        .route("/leaves/requests/:id/action", post(action_request))
        .route("/leaves/requests/:id/cancel", post(cancel_request))
}

async fn create_leave_type(
    State(state): State<AppState>,
    payload: Result<Json<NewLeaveType>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_leave_type");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().leave.create_leave_type(new),
    )
}

async fn list_leave_types(State(state): State<AppState>) -> Response {
    let correlation_id = start("list_leave_types");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().leave.list_leave_types()),
    )
}

async fn get_leave_type(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_leave_type");
    respond(correlation_id, StatusCode::OK, state.services().leave.get_leave_type(id))
}

async fn update_leave_type(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<LeaveTypeUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_leave_type");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().leave.update_leave_type(id, update),
    )
}

async fn delete_leave_type(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("delete_leave_type");
    no_content(correlation_id, state.services().leave.delete_leave_type(id))
}

async fn create_holiday(
    State(state): State<AppState>,
    payload: Result<Json<NewHoliday>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_holiday");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().leave.create_holiday(new),
    )
}

async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidayQuery>,
) -> Response {
    let correlation_id = start("list_holidays");
    let year = query.year.unwrap_or_else(current_year);
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state
            .services()
            .leave
            .list_holidays(year, query.country_code.as_deref())),
    )
}

async fn get_holiday(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_holiday");
    respond(correlation_id, StatusCode::OK, state.services().leave.get_holiday(id))
}

async fn update_holiday(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<HolidayUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_holiday");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().leave.update_holiday(id, update),
    )
}

async fn delete_holiday(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("delete_holiday");
    no_content(correlation_id, state.services().leave.delete_holiday(id))
}

async fn calculate_days(
    State(state): State<AppState>,
    Query(query): Query<LeaveDaysQuery>,
) -> Response {
    let correlation_id = start("calculate_leave_days");
    if let Err(err) = check_leave_range(query.start_date, query.end_date) {
        return failure(correlation_id, err);
    }
    let count = state.services().leave.calculate_leave_days(
        query.start_date,
        query.end_date,
        query.include_weekends,
        query.country_code.as_deref(),
    );
    info!(
        correlation_id = %correlation_id,
        days = %count.days,
        "Leave days calculated"
    );
    respond(correlation_id, StatusCode::OK, Ok(count))
}

async fn list_balances(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<YearQuery>,
) -> Response {
    let correlation_id = start("list_leave_balances");
    let year = query.year.unwrap_or_else(current_year);
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().leave.list_balances(employee_id, year),
    )
}

async fn check_balance(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<BalanceCheckQuery>,
) -> Response {
    let correlation_id = start("check_leave_balance");
    let year = query.year.unwrap_or_else(current_year);
    let sufficient = state.services().leave.check_leave_balance(
        employee_id,
        query.leave_type_id,
        query.days,
        year,
    );
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(BalanceCheckResponse { sufficient }),
    )
}

async fn initialize_balances(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<YearQuery>,
) -> Response {
    let correlation_id = start("initialize_leave_balances");
    let year = query.year.unwrap_or_else(current_year);
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .leave
            .initialize_employee_balances_for_year(employee_id, year),
    )
}

async fn accrue_leave(
    State(state): State<AppState>,
    payload: Result<Json<AccrualRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("accrue_monthly_leave");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().leave.accrue_monthly_leave(
            request.employee_id,
            request.leave_type_id,
            request.days,
            request.year,
        ),
    )
}

async fn adjust_balance(
    State(state): State<AppState>,
    Path((employee_id, leave_type_id)): Path<(i64, i64)>,
    payload: Result<Json<BalanceAdjustment>, JsonRejection>,
) -> Response {
    let correlation_id = start("adjust_leave_balance");
    let adjustment = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().leave.adjust_balance(
            employee_id,
            leave_type_id,
            adjustment.year,
            adjustment.allocated_days,
            adjustment.taken_days,
        ),
    )
}

async fn apply_for_leave(
    State(state): State<AppState>,
    payload: Result<Json<LeaveApplication>, JsonRejection>,
) -> Response {
    let correlation_id = start("apply_for_leave");
    let application = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().leave.apply_for_leave(application),
    )
}

async fn get_request(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_leave_request");
    respond(correlation_id, StatusCode::OK, state.services().leave.get_request(id))
}

async fn employee_requests(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<LeaveStatusQuery>,
) -> Response {
    let correlation_id = start("list_employee_leave_requests");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .leave
            .list_requests_for_employee(employee_id, query.status),
    )
}

async fn team_requests(
    State(state): State<AppState>,
    Path(manager_id): Path<i64>,
    Query(query): Query<LeaveStatusQuery>,
) -> Response {
    let correlation_id = start("list_team_leave_requests");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .leave
            .list_team_requests(manager_id, query.status),
    )
}

async fn action_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<LeaveDecision>, JsonRejection>,
) -> Response {
    let correlation_id = start("action_leave_request");
    let decision = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().leave.action_leave_request(id, decision),
    )
}

async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CancelLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("cancel_leave_request");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .leave
            .cancel_leave_request(id, request.employee_id),
    )
}
