//! Cart REST API handlers
//!
//! All cart routes are customer-facing and keyed by table; the manual
//! sweep is the one staff-only route.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{AddCartItemRequest, CartResponse, SweepResponse, UpdateCartItemRequest};
use crate::application::CartService;
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};

#[derive(Clone)]
pub struct CartHandlerState {
    pub carts: Arc<CartService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/carts/table/{table_id}",
    tag = "Carts",
    params(("table_id" = i32, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Current cart, possibly empty", body = ApiResponse<CartResponse>),
        (status = 404, description = "Table not found")
    )
)]
pub async fn get_cart(
    State(state): State<CartHandlerState>,
    Path(table_id): Path<i32>,
) -> Result<Json<ApiResponse<CartResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let cart = state.carts.get_cart(table_id).await.map_err(error_response)?;
    let response = cart
        .map(CartResponse::from)
        .unwrap_or_else(|| CartResponse::empty(table_id));
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/carts/table/{table_id}/items",
    tag = "Carts",
    params(("table_id" = i32, Path, description = "Table ID")),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added or merged into an existing line", body = ApiResponse<CartResponse>),
        (status = 404, description = "Table or menu not found"),
        (status = 409, description = "Table not occupied or menu unavailable")
    )
)]
pub async fn add_cart_item(
    State(state): State<CartHandlerState>,
    Path(table_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<AddCartItemRequest>,
) -> Result<Json<ApiResponse<CartResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let cart = state
        .carts
        .add_item(table_id, req.menu_id, req.quantity, req.notes)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(cart.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/carts/table/{table_id}/items/{item_id}",
    tag = "Carts",
    params(
        ("table_id" = i32, Path, description = "Table ID"),
        ("item_id" = i32, Path, description = "Cart item ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity changed", body = ApiResponse<CartResponse>),
        (status = 404, description = "Item not in this table's cart"),
        (status = 409, description = "Menu no longer available")
    )
)]
pub async fn update_cart_item(
    State(state): State<CartHandlerState>,
    Path((table_id, item_id)): Path<(i32, i32)>,
    ValidatedJson(req): ValidatedJson<UpdateCartItemRequest>,
) -> Result<Json<ApiResponse<CartResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let cart = state
        .carts
        .update_item_quantity(table_id, item_id, req.quantity)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(cart.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/carts/table/{table_id}/items/{item_id}",
    tag = "Carts",
    params(
        ("table_id" = i32, Path, description = "Table ID"),
        ("item_id" = i32, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartResponse>),
        (status = 404, description = "Item not in this table's cart")
    )
)]
pub async fn remove_cart_item(
    State(state): State<CartHandlerState>,
    Path((table_id, item_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<CartResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let cart = state
        .carts
        .remove_item(table_id, item_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(cart.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/carts/table/{table_id}",
    tag = "Carts",
    params(("table_id" = i32, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Cart cleared"),
        (status = 404, description = "Table not found")
    )
)]
pub async fn clear_cart(
    State(state): State<CartHandlerState>,
    Path(table_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state.carts.clear(table_id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success("Cart cleared".to_string())))
}

#[utoipa::path(
    post,
    path = "/api/v1/carts/sweep",
    tag = "Carts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty carts removed", body = ApiResponse<SweepResponse>)
    )
)]
pub async fn sweep_carts(
    State(state): State<CartHandlerState>,
) -> Result<Json<ApiResponse<SweepResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let removed = state.carts.sweep_empty().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(SweepResponse { removed })))
}
