//! Order REST API handlers
//!
//! Customers place, read and (while Pending) cancel orders; the kitchen
//! drives the status chain through the staff routes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CancelOrderRequest, CreateOrderRequest, DayOrderStatsResponse, OrderListQuery, OrderResponse,
    OrderStatusCountsResponse, UpdateOrderStatusRequest,
};
use crate::application::OrderService;
use crate::domain::order::OrderStatus;
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::shared::DomainError;

#[derive(Clone)]
pub struct OrderHandlerState {
    pub orders: Arc<OrderService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/table/{table_id}",
    tag = "Orders",
    params(("table_id" = i32, Path, description = "Table ID")),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed, cart drained", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Table not found"),
        (status = 409, description = "Table not occupied or cart empty")
    )
)]
pub async fn create_order(
    State(state): State<OrderHandlerState>,
    Path(table_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    let order = state
        .orders
        .create_from_cart(table_id, req.notes)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<OrderResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let order = state.orders.get(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(order.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/table/{table_id}/active",
    tag = "Orders",
    params(("table_id" = i32, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Open orders of the table, oldest first", body = ApiResponse<Vec<OrderResponse>>),
        (status = 404, description = "Table not found")
    )
)]
pub async fn list_active_orders(
    State(state): State<OrderHandlerState>,
    Path(table_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let orders = state
        .orders
        .active_for_table(table_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        orders.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    tag = "Orders",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Order is no longer Pending")
    )
)]
pub async fn cancel_order(
    State(state): State<OrderHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CancelOrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let order = state
        .orders
        .cancel(id, &req.reason)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(order.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(OrderListQuery, PaginationParams),
    responses(
        (status = 200, description = "All orders, newest first", body = PaginatedResponse<OrderResponse>)
    )
)]
pub async fn list_orders(
    State(state): State<OrderHandlerState>,
    Query(query): Query<OrderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<OrderResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = match query.status.as_deref() {
        Some(s) => Some(OrderStatus::parse(s).ok_or_else(|| {
            error_response(DomainError::Validation(format!("unknown order status: {s}")))
        })?),
        None => None,
    };

    let (page, limit) = pagination.normalized();
    let (orders, total) = state
        .orders
        .list(status, page, limit)
        .await
        .map_err(error_response)?;
    let items: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/status",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status advanced; completion also frees the table", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn update_order_status(
    State(state): State<OrderHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let next = OrderStatus::parse(&req.status).ok_or_else(|| {
        error_response(DomainError::Validation(format!(
            "unknown order status: {}",
            req.status
        )))
    })?;
    let order = state
        .orders
        .update_status(id, next)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(order.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/stats/status-counts",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order counts per status", body = ApiResponse<OrderStatusCountsResponse>)
    )
)]
pub async fn get_status_counts(
    State(state): State<OrderHandlerState>,
) -> Result<Json<ApiResponse<OrderStatusCountsResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let counts = state.orders.status_counts().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(counts.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/stats/today",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Today's order volume and revenue", body = ApiResponse<DayOrderStatsResponse>)
    )
)]
pub async fn get_today_stats(
    State(state): State<OrderHandlerState>,
) -> Result<Json<ApiResponse<DayOrderStatsResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let stats = state.orders.today_stats().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(stats.into())))
}
