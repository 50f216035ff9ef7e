//! Goals, appraisal cycles and reviews.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};

use crate::api::request::{
    CycleStatusQuery, GoalQuery, InitiateReviewsRequest, ReviewQuery, ReviewStatusRequest,
};
use crate::api::state::AppState;
use crate::services::{
    AppraisalCycleUpdate, GoalUpdate, ManagerFeedback, NewAppraisalCycle, NewGoal, SelfEvaluation,
};

use super::{no_content, read_body, respond, start};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/performance/goals", post(create_goal))
        .route("/performance/goals/employee/:employee_id", get(employee_goals))
        .route("/performance/goals/team/:manager_id", get(team_goals))
        .route(
            "/performance/goals/:id",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/performance/cycles", post(create_cycle).get(list_cycles))
        .route("/performance/cycles/:id", get(get_cycle).put(update_cycle))
        .route(
            "/performance/cycles/:id/reviews",
            post(initiate_reviews).get(list_reviews),
        )
        .route("/performance/reviews/:id", get(get_review))
        .route(
            "/performance/reviews/:id/self-evaluation",
            post(submit_self_evaluation),
        )
        .route(
            "/performance/reviews/:id/manager-feedback",
            post(submit_manager_feedback),
        )
        .route("/performance/reviews/:id/status", put(update_review_status))
}

async fn create_goal(
    State(state): State<AppState>,
    payload: Result<Json<NewGoal>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_goal");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().performance.create_goal(new),
    )
}

async fn employee_goals(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<GoalQuery>,
) -> Response {
    let correlation_id = start("list_goals");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .list_goals(employee_id, query.cycle_id),
    )
}

async fn team_goals(
    State(state): State<AppState>,
    Path(manager_id): Path<i64>,
    Query(query): Query<GoalQuery>,
) -> Response {
    let correlation_id = start("list_team_goals");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .list_team_goals(manager_id, query.cycle_id),
    )
}

async fn get_goal(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_goal");
    respond(correlation_id, StatusCode::OK, state.services().performance.get_goal(id))
}

async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<GoalUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_goal");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().performance.update_goal(id, update),
    )
}

async fn delete_goal(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("delete_goal");
    no_content(correlation_id, state.services().performance.delete_goal(id))
}

async fn create_cycle(
    State(state): State<AppState>,
    payload: Result<Json<NewAppraisalCycle>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_appraisal_cycle");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().performance.create_cycle(new),
    )
}

async fn list_cycles(
    State(state): State<AppState>,
    Query(query): Query<CycleStatusQuery>,
) -> Response {
    let correlation_id = start("list_appraisal_cycles");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().performance.list_cycles(query.status)),
    )
}

async fn get_cycle(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_appraisal_cycle");
    respond(correlation_id, StatusCode::OK, state.services().performance.get_cycle(id))
}

async fn update_cycle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<AppraisalCycleUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_appraisal_cycle");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().performance.update_cycle(id, update),
    )
}

async fn initiate_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<InitiateReviewsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("initiate_reviews");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .initiate_reviews(id, &request.employee_ids),
    )
}

async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ReviewQuery>,
) -> Response {
    let correlation_id = start("list_reviews");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .list_reviews(id, query.manager_id),
    )
}

async fn get_review(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_review");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().performance.get_review(id),
    )
}

async fn submit_self_evaluation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<SelfEvaluation>, JsonRejection>,
) -> Response {
    let correlation_id = start("submit_self_evaluation");
    let evaluation = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .submit_self_evaluation(id, evaluation),
    )
}

async fn submit_manager_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ManagerFeedback>, JsonRejection>,
) -> Response {
    let correlation_id = start("submit_manager_feedback");
    let feedback = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .submit_manager_feedback(id, feedback),
    )
}

async fn update_review_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ReviewStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_review_status");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .performance
            .update_review_status(id, request.status),
    )
}
