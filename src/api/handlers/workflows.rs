//! Workflow templates, assignment and step progress.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};

use crate::api::request::{AssignWorkflowRequest, WorkflowStatusQuery};
use crate::api::state::AppState;
use crate::services::{NewWorkflowTemplate, StepUpdate, TemplateFilter, WorkflowTemplateUpdate};

use super::{read_body, respond, start};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/workflows/templates", post(create_template).get(list_templates))
        .route(
            "/workflows/templates/:id",
            get(get_template).put(update_template),
        )
        .route("/workflows/assign", post(assign_workflow))
        .route("/workflows/employees/:employee_id", get(employee_workflows))
        .route("/workflows/instances/:id", get(get_workflow))
        .route("/workflows/steps/:id", put(update_step))
}

async fn create_template(
    State(state): State<AppState>,
    payload: Result<Json<NewWorkflowTemplate>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_workflow_template");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().workflows.create_template(new),
    )
}

async fn list_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Response {
    let correlation_id = start("list_workflow_templates");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().workflows.list_templates(filter)),
    )
}

async fn get_template(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_workflow_template");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().workflows.get_template(id),
    )
}

async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<WorkflowTemplateUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_workflow_template");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().workflows.update_template(id, update),
    )
}

async fn assign_workflow(
    State(state): State<AppState>,
    payload: Result<Json<AssignWorkflowRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("assign_workflow");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().workflows.assign_workflow(
            request.employee_id,
            request.template_id,
            request.due_date,
        ),
    )
}

async fn employee_workflows(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<WorkflowStatusQuery>,
) -> Response {
    let correlation_id = start("list_employee_workflows");
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .workflows
            .list_employee_workflows(employee_id, query.status),
    )
}

async fn get_workflow(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_employee_workflow");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().workflows.get_employee_workflow(id),
    )
}

async fn update_step(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<StepUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_workflow_step");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .workflows
            .update_employee_workflow_step(id, update),
    )
}
