//! Authentication API handlers
//!
//! Login is the only public route here; new staff accounts are created
//! by an already-authenticated admin.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use tracing::info;

use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserInfo,
};
use crate::domain::user::{User, UserRole};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::DomainError;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user = state
        .repos
        .users()
        .find_by_login(&request.username)
        .await
        .map_err(error_response)?;

    // Identical error for unknown account and wrong password
    let Some(mut user) = user else {
        return Err(error_response(DomainError::Unauthorized(
            "invalid credentials".into(),
        )));
    };

    if !user.is_active {
        return Err(error_response(DomainError::Unauthorized(
            "account is disabled".into(),
        )));
    }

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(error_response(DomainError::Unauthorized(
            "invalid credentials".into(),
        )));
    }

    user.last_login_at = Some(Utc::now());
    // A failed audit update must not block the login
    state.repos.users().update(&user).await.ok();

    let role = user.role.to_string();
    let token = create_token(user.id, &user.username, &role, &state.jwt_config)
        .map_err(|e| error_response(DomainError::Database(e.to_string())))?;

    info!("Staff login: {}", user.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: user.into(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Staff account created", body = ApiResponse<UserInfo>),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), (StatusCode, Json<ApiResponse<()>>)> {
    if !caller.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Only admins can create accounts")),
        ));
    }

    let role = match request.role.as_deref() {
        None => UserRole::Staff,
        Some(s) => UserRole::parse(s).ok_or_else(|| {
            error_response(DomainError::Validation(format!("unknown role: {s}")))
        })?,
    };

    if state
        .repos
        .users()
        .exists_by_username(&request.username)
        .await
        .map_err(error_response)?
        || state
            .repos
            .users()
            .exists_by_email(&request.email)
            .await
            .map_err(error_response)?
    {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Username or email already exists")),
        ));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| error_response(DomainError::Database(e.to_string())))?;

    let now = Utc::now();
    let user = state
        .repos
        .users()
        .save(User {
            id: 0,
            username: request.username,
            email: request.email,
            password_hash,
            role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(error_response)?;

    info!("Staff account {} created by {}", user.username, caller.username);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user = state
        .repos
        .users()
        .find_by_id(caller.user_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(DomainError::not_found("User", "id", caller.user_id)))?;

    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Invalid current password")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    let mut user = state
        .repos
        .users()
        .find_by_id(caller.user_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(DomainError::not_found("User", "id", caller.user_id)))?;

    let password_valid =
        verify_password(&request.current_password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(error_response(DomainError::Unauthorized(
            "invalid current password".into(),
        )));
    }

    user.password_hash = hash_password(&request.new_password)
        .map_err(|e| error_response(DomainError::Database(e.to_string())))?;
    state.repos.users().update(&user).await.map_err(error_response)?;

    Ok(Json(ApiResponse::success("Password changed".to_string())))
}
