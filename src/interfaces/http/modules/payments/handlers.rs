//! Payment REST API handlers
//!
//! A declined card attempt comes back as a 200 with the Failed payment
//! in the body: the attempt itself worked, its outcome is data. Only a
//! gateway transport error or refund decline surfaces as 502.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{DayPaymentStatsResponse, PaymentRequest, PaymentResponse, RefundRequest};
use crate::application::PaymentService;
use crate::domain::payment::PaymentMethod;
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};

#[derive(Clone)]
pub struct PaymentHandlerState {
    pub payments: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/card",
    tag = "Payments",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Attempt settled; Completed on approval, Failed on decline", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order not payable or amount mismatch"),
        (status = 502, description = "Gateway unreachable")
    )
)]
pub async fn pay_by_card(
    State(state): State<PaymentHandlerState>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let payment = state
        .payments
        .pay(req.order_id, PaymentMethod::Card, req.amount)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/cash",
    tag = "Payments",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Cash settled, order moved to Preparing", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order not payable or amount mismatch")
    )
)]
pub async fn pay_by_cash(
    State(state): State<PaymentHandlerState>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let payment = state
        .payments
        .pay(req.order_id, PaymentMethod::Cash, req.amount)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment details", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_payment(
    State(state): State<PaymentHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PaymentResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let payment = state.payments.get(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/order/{order_id}",
    tag = "Payments",
    params(("order_id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order's payment", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "No payment for this order")
    )
)]
pub async fn get_payment_by_order(
    State(state): State<PaymentHandlerState>,
    Path(order_id): Path<i32>,
) -> Result<Json<ApiResponse<PaymentResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let payment = state
        .payments
        .get_by_order(order_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/refund",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refunded; the order is cancelled with it", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Payment is not Completed"),
        (status = 502, description = "Gateway declined the refund")
    )
)]
pub async fn refund_payment(
    State(state): State<PaymentHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<RefundRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let payment = state
        .payments
        .refund(id, &req.reason)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/stats/today",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Today's completed payments", body = ApiResponse<DayPaymentStatsResponse>)
    )
)]
pub async fn get_today_stats(
    State(state): State<PaymentHandlerState>,
) -> Result<Json<ApiResponse<DayPaymentStatsResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let stats = state.payments.today_stats().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(stats.into())))
}
