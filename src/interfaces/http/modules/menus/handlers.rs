//! Menu REST API handlers
//!
//! Customers see only available menus; the admin listing and all
//! mutations are staff-only.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateMenuOptionRequest, CreateMenuRequest, MenuDetailResponse, MenuListQuery,
    MenuOptionResponse, MenuResponse, UpdateMenuAvailabilityRequest, UpdateMenuOptionRequest,
    UpdateMenuRequest,
};
use crate::application::MenuService;
use crate::domain::menu::MenuFilter;
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};

#[derive(Clone)]
pub struct MenuHandlerState {
    pub menus: Arc<MenuService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/menus",
    tag = "Menus",
    params(MenuListQuery),
    responses(
        (status = 200, description = "Currently available menus", body = ApiResponse<Vec<MenuResponse>>)
    )
)]
pub async fn list_menus(
    State(state): State<MenuHandlerState>,
    Query(query): Query<MenuListQuery>,
) -> Result<Json<ApiResponse<Vec<MenuResponse>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = MenuFilter {
        category: query.category,
        search: query.search,
    };
    let menus = state
        .menus
        .list_available(filter)
        .await
        .map_err(error_response)?;
    let items: Vec<MenuResponse> = menus.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/menus/{id}",
    tag = "Menus",
    params(("id" = i32, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu with its options", body = ApiResponse<MenuDetailResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_menu(
    State(state): State<MenuHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MenuDetailResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let menu = state.menus.get(id).await.map_err(error_response)?;
    let options = state.menus.list_options(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(MenuDetailResponse {
        menu: menu.into(),
        options: options.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/menus/admin",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "All menus including unavailable ones", body = PaginatedResponse<MenuResponse>)
    )
)]
pub async fn list_all_menus(
    State(state): State<MenuHandlerState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<MenuResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let (page, limit) = pagination.normalized();
    let (menus, total) = state
        .menus
        .list_all(page, limit)
        .await
        .map_err(error_response)?;
    let items: Vec<MenuResponse> = menus.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/menus",
    tag = "Menus",
    security(("bearer_auth" = [])),
    request_body = CreateMenuRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<MenuResponse>),
        (status = 400, description = "Invalid price or stock")
    )
)]
pub async fn create_menu(
    State(state): State<MenuHandlerState>,
    ValidatedJson(req): ValidatedJson<CreateMenuRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MenuResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    let menu = state
        .menus
        .create(
            req.name,
            req.description,
            req.price,
            req.category,
            req.image_url,
            req.stock_quantity,
        )
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(menu.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/menus/{id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Menu ID")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<MenuResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_menu(
    State(state): State<MenuHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateMenuRequest>,
) -> Result<Json<ApiResponse<MenuResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let menu = state
        .menus
        .update(
            id,
            req.name,
            req.description,
            req.price,
            req.category,
            req.image_url,
            req.stock_quantity,
        )
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(menu.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/menus/{id}/availability",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Menu ID")),
    request_body = UpdateMenuAvailabilityRequest,
    responses(
        (status = 200, description = "Availability toggled", body = ApiResponse<MenuResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_menu_availability(
    State(state): State<MenuHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateMenuAvailabilityRequest>,
) -> Result<Json<ApiResponse<MenuResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let menu = state
        .menus
        .set_availability(id, req.is_available)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(menu.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menus/{id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_menu(
    State(state): State<MenuHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state.menus.delete(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success("Menu deleted".to_string())))
}

// ── Options ────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/menus/{id}/options",
    tag = "Menus",
    params(("id" = i32, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Options of the menu", body = ApiResponse<Vec<MenuOptionResponse>>),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn list_menu_options(
    State(state): State<MenuHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<MenuOptionResponse>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let options = state.menus.list_options(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        options.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/menus/{id}/options",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Menu ID")),
    request_body = CreateMenuOptionRequest,
    responses(
        (status = 201, description = "Option created", body = ApiResponse<MenuOptionResponse>),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn create_menu_option(
    State(state): State<MenuHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CreateMenuOptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MenuOptionResponse>>), (StatusCode, Json<ApiResponse<()>>)>
{
    let option = state
        .menus
        .add_option(id, req.name, req.extra_price)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(option.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/menus/{id}/options/{option_id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Menu ID"),
        ("option_id" = i32, Path, description = "Option ID")
    ),
    request_body = UpdateMenuOptionRequest,
    responses(
        (status = 200, description = "Option updated", body = ApiResponse<MenuOptionResponse>),
        (status = 404, description = "Option not found on this menu")
    )
)]
pub async fn update_menu_option(
    State(state): State<MenuHandlerState>,
    Path((id, option_id)): Path<(i32, i32)>,
    ValidatedJson(req): ValidatedJson<UpdateMenuOptionRequest>,
) -> Result<Json<ApiResponse<MenuOptionResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let option = state
        .menus
        .update_option(id, option_id, req.name, req.extra_price, req.is_available)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(option.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/menus/{id}/options/{option_id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Menu ID"),
        ("option_id" = i32, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Option deleted"),
        (status = 404, description = "Option not found on this menu")
    )
)]
pub async fn delete_menu_option(
    State(state): State<MenuHandlerState>,
    Path((id, option_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .menus
        .delete_option(id, option_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success("Option deleted".to_string())))
}
