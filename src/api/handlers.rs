//! HTTP request handlers for the cost dashboard API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::commands::{EmployeeCommand, EmployeePatch, LicenseCommand, LicensePatch, NewLicense};
use crate::error::DashboardError;
use crate::normalize::NewEmployee;
use crate::storage::ExportOptions;

use super::request::{
    DashboardQuery, EmployeePatchRequest, EmployeeRequest, LicensePatchRequest, LicenseRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/employees", post(add_employee_handler))
        .route(
            "/employees/:index",
            put(edit_employee_handler).delete(remove_employee_handler),
        )
        .route("/licenses", post(add_license_handler))
        .route(
            "/licenses/:index",
            put(edit_license_handler).delete(remove_license_handler),
        )
        .route("/export/employees", get(export_employees_handler))
        .route("/export/licenses", get(export_licenses_handler))
        .with_state(state)
}

fn failure(correlation_id: Uuid, error: DashboardError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn query_params<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiErrorResponse> {
    query.map(|Query(params)| params).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
        ApiErrorResponse::bad_request(ApiError::new("INVALID_QUERY", rejection.body_text()))
    })
}

fn record_index(
    correlation_id: Uuid,
    path: Result<Path<usize>, PathRejection>,
) -> Result<usize, ApiErrorResponse> {
    path.map(|Path(index)| index).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid record index");
        ApiErrorResponse::bad_request(ApiError::new("INVALID_INDEX", rejection.body_text()))
    })
}

/// Handler for `GET /dashboard`.
async fn dashboard_handler(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Building dashboard view");

    let criteria = DashboardQuery::from_pairs(query_params(correlation_id, query)?)
        .into_criteria()
        .map_err(|e| failure(correlation_id, e))?;

    let start_time = Instant::now();
    let view = state
        .store()
        .lock()
        .await
        .view(&criteria)
        .map_err(|e| failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        employees = view.employees.len(),
        licenses = view.licenses.len(),
        grand_total_monthly = %view.totals.grand_total_monthly,
        warnings = view.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Dashboard view built"
    );
    Ok((StatusCode::OK, Json(view)).into_response())
}

async fn run_employee_command(
    state: &AppState,
    correlation_id: Uuid,
    command: EmployeeCommand,
    status: StatusCode,
) -> HandlerResult {
    let records = state
        .store()
        .lock()
        .await
        .run_employee_command(command)
        .map_err(|e| failure(correlation_id, e))?;
    info!(correlation_id = %correlation_id, records = records.len(), "Employee command applied");
    Ok((status, Json(records)).into_response())
}

async fn run_license_command(
    state: &AppState,
    correlation_id: Uuid,
    command: LicenseCommand,
    status: StatusCode,
) -> HandlerResult {
    let records = state
        .store()
        .lock()
        .await
        .run_license_command(command)
        .map_err(|e| failure(correlation_id, e))?;
    info!(correlation_id = %correlation_id, records = records.len(), "License command applied");
    Ok((status, Json(records)).into_response())
}

/// Handler for `POST /employees`.
async fn add_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Adding employee");

    let input = NewEmployee::try_from(json_body(correlation_id, payload)?)
        .map_err(|e| failure(correlation_id, e))?;
    run_employee_command(&state, correlation_id, EmployeeCommand::Add(input), StatusCode::CREATED).await
}

/// Handler for `PUT /employees/:index`.
async fn edit_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
    payload: Result<Json<EmployeePatchRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let index = record_index(correlation_id, path)?;
    info!(correlation_id = %correlation_id, index, "Editing employee");

    let patch = EmployeePatch::try_from(json_body(correlation_id, payload)?)
        .map_err(|e| failure(correlation_id, e))?;
    run_employee_command(
        &state,
        correlation_id,
        EmployeeCommand::Edit { index, patch },
        StatusCode::OK,
    )
    .await
}

/// Handler for `DELETE /employees/:index`.
async fn remove_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let index = record_index(correlation_id, path)?;
    info!(correlation_id = %correlation_id, index, "Removing employee");
    run_employee_command(&state, correlation_id, EmployeeCommand::Remove { index }, StatusCode::OK).await
}

/// Handler for `POST /licenses`.
async fn add_license_handler(
    State(state): State<AppState>,
    payload: Result<Json<LicenseRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Adding license");

    let input = NewLicense::try_from(json_body(correlation_id, payload)?)
        .map_err(|e| failure(correlation_id, e))?;
    run_license_command(&state, correlation_id, LicenseCommand::Add(input), StatusCode::CREATED).await
}

/// Handler for `PUT /licenses/:index`.
async fn edit_license_handler(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
    payload: Result<Json<LicensePatchRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let index = record_index(correlation_id, path)?;
    info!(correlation_id = %correlation_id, index, "Editing license");

    let patch = LicensePatch::try_from(json_body(correlation_id, payload)?)
        .map_err(|e| failure(correlation_id, e))?;
    run_license_command(
        &state,
        correlation_id,
        LicenseCommand::Edit { index, patch },
        StatusCode::OK,
    )
    .await
}

/// Handler for `DELETE /licenses/:index`.
async fn remove_license_handler(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let index = record_index(correlation_id, path)?;
    info!(correlation_id = %correlation_id, index, "Removing license");
    run_license_command(&state, correlation_id, LicenseCommand::Remove { index }, StatusCode::OK).await
}

fn csv_download(file_name: &str, text: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        text,
    )
        .into_response()
}

/// Handler for `GET /export/employees`.
async fn export_employees_handler(
    State(state): State<AppState>,
    query: Result<Query<ExportOptions>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let options = query_params(correlation_id, query)?;
    info!(correlation_id = %correlation_id, ?options, "Exporting employees");

    let text = state
        .store()
        .lock()
        .await
        .export_employees(options)
        .map_err(|e| failure(correlation_id, e))?;
    Ok(csv_download("employees.csv", text))
}

/// Handler for `GET /export/licenses`.
async fn export_licenses_handler(
    State(state): State<AppState>,
    query: Result<Query<ExportOptions>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let options = query_params(correlation_id, query)?;
    info!(correlation_id = %correlation_id, ?options, "Exporting licenses");

    let text = state
        .store()
        .lock()
        .await
        .export_licenses(options)
        .map_err(|e| failure(correlation_id, e))?;
    Ok(csv_download("licenses.csv", text))
}
