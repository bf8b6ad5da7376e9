//! Table REST API handlers
//!
//! The scan endpoint is the one customer-facing route; everything else
//! is staff-only and sits behind the JWT middleware.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateTableRequest, TableResponse, TableStatsResponse, UpdateTableRequest,
    UpdateTableStatusRequest,
};
use crate::application::TableService;
use crate::domain::table::TableStatus;
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::shared::DomainError;

#[derive(Clone)]
pub struct TableHandlerState {
    pub tables: Arc<TableService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/scan/{qr_code}",
    tag = "Tables",
    params(("qr_code" = String, Path, description = "Token from the table's QR code")),
    responses(
        (status = 200, description = "Table info; an available table is now occupied", body = ApiResponse<TableResponse>),
        (status = 404, description = "Unknown or retired QR code"),
        (status = 409, description = "Table is under maintenance")
    )
)]
pub async fn scan_table(
    State(state): State<TableHandlerState>,
    Path(qr_code): Path<String>,
) -> Result<Json<ApiResponse<TableResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let table = state.tables.scan_qr(&qr_code).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Active tables", body = PaginatedResponse<TableResponse>)
    )
)]
pub async fn list_tables(
    State(state): State<TableHandlerState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<TableResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let (page, limit) = pagination.normalized();
    let (tables, total) = state.tables.list(page, limit).await.map_err(error_response)?;
    let items: Vec<TableResponse> = tables.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/stats",
    tag = "Tables",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Occupancy counts", body = ApiResponse<TableStatsResponse>)
    )
)]
pub async fn get_table_stats(
    State(state): State<TableHandlerState>,
) -> Result<Json<ApiResponse<TableStatsResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let stats = state.tables.stats().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table details", body = ApiResponse<TableResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_table(
    State(state): State<TableHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TableResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let table = state.tables.get(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables",
    tag = "Tables",
    security(("bearer_auth" = [])),
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Created, QR code assigned", body = ApiResponse<TableResponse>),
        (status = 409, description = "Table number already in use")
    )
)]
pub async fn create_table(
    State(state): State<TableHandlerState>,
    ValidatedJson(req): ValidatedJson<CreateTableRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TableResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    let table = state
        .tables
        .create(req.table_number, req.seat_count, req.location_description)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(table.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/tables/{id}",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table ID")),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<TableResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Table number already in use")
    )
)]
pub async fn update_table(
    State(state): State<TableHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateTableRequest>,
) -> Result<Json<ApiResponse<TableResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let table = state
        .tables
        .update_info(id, req.table_number, req.seat_count, req.location_description)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/tables/{id}/status",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table ID")),
    request_body = UpdateTableStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<TableResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status change")
    )
)]
pub async fn update_table_status(
    State(state): State<TableHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateTableStatusRequest>,
) -> Result<Json<ApiResponse<TableResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = TableStatus::parse(&req.status).ok_or_else(|| {
        error_response(DomainError::Validation(format!(
            "unknown table status: {}",
            req.status
        )))
    })?;
    let table = state
        .tables
        .set_status(id, status)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables/{id}/regenerate-qr",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table ID")),
    responses(
        (status = 200, description = "New QR code assigned; the old one stops working", body = ApiResponse<TableResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn regenerate_qr(
    State(state): State<TableHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TableResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let table = state.tables.regenerate_qr(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(table.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tables/{id}",
    tag = "Tables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Soft-deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Table is occupied")
    )
)]
pub async fn delete_table(
    State(state): State<TableHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state.tables.delete(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success("Table deleted".to_string())))
}
