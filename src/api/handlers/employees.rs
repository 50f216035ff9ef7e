//! Users, departments, employee profiles, lifecycle and documents.

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::api::request::{DocumentMetadata, OffboardingBody, OnboardingRequest};
use crate::api::state::AppState;
use crate::error::{HrError, HrResult};
use crate::services::{
    sanitize_file_name, DepartmentUpdate, EmployeeFilter, EmployeeProfileUpdate, NewDepartment,
    NewDocument, NewEmployeeProfile, NewUser, OffboardingRequest,
};

use super::{failure, no_content, read_body, respond, start};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id", get(get_user))
        .route("/departments", post(create_department).get(list_departments))
        .route("/departments/:id", get(get_department).put(update_department))
        .route("/employees", post(create_employee).get(list_employees))
        .route("/employees/onboarding/complete", post(complete_onboarding))
        .route("/employees/offboarding/initiate", post(initiate_offboarding))
        .route("/employees/:id", get(get_employee).put(update_employee))
        .route("/employees/:id/reports", get(direct_reports))
        .route(
            "/employees/:id/documents",
            post(upload_document)
                .get(list_documents)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/documents/:id", get(get_document).delete(delete_document))
        .route("/documents/:id/download", get(download_document))
}

async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_user");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().employees.create_user(new),
    )
}

async fn list_users(State(state): State<AppState>) -> Response {
    let correlation_id = start("list_users");
    respond(correlation_id, StatusCode::OK, Ok(state.services().employees.list_users()))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_user");
    respond(correlation_id, StatusCode::OK, state.services().employees.get_user(id))
}

async fn create_department(
    State(state): State<AppState>,
    payload: Result<Json<NewDepartment>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_department");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().employees.create_department(new),
    )
}

async fn list_departments(State(state): State<AppState>) -> Response {
    let correlation_id = start("list_departments");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().employees.list_departments()),
    )
}

async fn get_department(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_department");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().employees.get_department(id),
    )
}

async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<DepartmentUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_department");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().employees.update_department(id, update),
    )
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployeeProfile>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_employee_profile");
    let new = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::CREATED,
        state.services().employees.create_employee_profile(new),
    )
}

async fn list_employees(
    State(state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> Response {
    let correlation_id = start("list_employees");
    respond(
        correlation_id,
        StatusCode::OK,
        Ok(state.services().employees.list_employees(filter)),
    )
}

async fn get_employee(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_employee");
    respond(correlation_id, StatusCode::OK, state.services().employees.get_employee(id))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<EmployeeProfileUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_employee_profile");
    let update = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().employees.update_employee_profile(id, update),
    )
}

async fn direct_reports(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("direct_reports");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().employees.direct_reports(id),
    )
}

async fn complete_onboarding(
    State(state): State<AppState>,
    payload: Result<Json<OnboardingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("complete_onboarding");
    let request = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let result = state
        .services()
        .employees
        .complete_onboarding(request.employee_id);
    if let Ok(outcome) = &result {
        info!(
            correlation_id = %correlation_id,
            employee_id = request.employee_id,
            status = %outcome.employee.employment_status,
            "Onboarding request handled"
        );
    }
    respond(correlation_id, StatusCode::OK, result)
}

async fn initiate_offboarding(
    State(state): State<AppState>,
    payload: Result<Json<OffboardingBody>, JsonRejection>,
) -> Response {
    let correlation_id = start("initiate_offboarding");
    let body = match read_body(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        StatusCode::OK,
        state
            .services()
            .employees
            .initiate_offboarding(body.employee_id, OffboardingRequest::from(&body)),
    )
}

/// Expects a `metadata` JSON part and a `file` part.
async fn upload_document(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = start("upload_document");
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => Err(HrError::validation("file", rejection.body_text())),
    };
    let (new, bytes) = match upload {
        Ok(upload) => upload,
        Err(err) => return failure(correlation_id, err),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id,
        file_name = %new.file_name,
        size = bytes.len(),
        "Receiving document"
    );
    let result = state
        .services()
        .documents
        .upload(employee_id, new, &bytes)
        .await;
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn read_upload(mut multipart: Multipart) -> HrResult<(NewDocument, Bytes)> {
    let mut metadata: Option<DocumentMetadata> = None;
    let mut file: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HrError::validation("file", format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("metadata") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| HrError::validation("metadata", e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| HrError::validation("metadata", e.to_string()))?;
                metadata = Some(parsed);
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| HrError::validation("file", e.to_string()))?;
                file = Some((file_name, bytes));
            }
            _ => {}
        }
    }

    let metadata =
        metadata.ok_or_else(|| HrError::validation("metadata", "missing 'metadata' part"))?;
    let (file_name, bytes) =
        file.ok_or_else(|| HrError::validation("file", "missing 'file' part"))?;
    Ok((metadata.into_new_document(file_name), bytes))
}

async fn list_documents(State(state): State<AppState>, Path(employee_id): Path<i64>) -> Response {
    let correlation_id = start("list_documents");
    respond(
        correlation_id,
        StatusCode::OK,
        state.services().documents.list(employee_id),
    )
}

async fn get_document(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("get_document");
    respond(correlation_id, StatusCode::OK, state.services().documents.get(id))
}

async fn download_document(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("download_document");
    match state.services().documents.download(id).await {
        Ok((document, bytes)) => {
            info!(
                correlation_id = %correlation_id,
                document_id = id,
                size = bytes.len(),
                "Document downloaded"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!(
                            "attachment; filename=\"{}\"",
                            sanitize_file_name(&document.file_name)
                        ),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => failure(correlation_id, err),
    }
}

async fn delete_document(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = start("delete_document");
    let result = state.services().documents.delete(id).await.map(|_| ());
    no_content(correlation_id, result)
}
