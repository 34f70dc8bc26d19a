use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::domain::model::User;
use crate::utils::error::{AppError, Result};
use crate::utils::validation;
use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

const BEARER_PREFIX: &str = "Bearer ";
pub(crate) const REQUIRED: &str = "This field is required.";

/// Caller resolved from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthenticated)?;
        let user = state
            .auth
            .current_user(token)
            .await
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self(user))
    }
}

impl FromRequestParts<SharedState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden {
                message: "This action is unauthorized.".to_string(),
            });
        }
        Ok(Self(user))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub(crate) fn body_error(rejection: JsonRejection) -> AppError {
    AppError::invalid_input("body", rejection.body_text())
}

pub async fn login(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>> {
    let Json(request) = payload.map_err(body_error)?;

    let email = request
        .email
        .ok_or_else(|| AppError::invalid_input("email", REQUIRED))?;
    validation::validate_email("email", &email)?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid_input("password", REQUIRED))?;

    let (token, user) = state.auth.authenticate(&email, &password).await?;

    Ok(Json(
        ApiResponse::success(json!({
            "token": token,
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "role": user.role,
            }
        }))
        .with_message("Login successful"),
    ))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "created_at": user.created_at,
            "updated_at": user.updated_at,
        }
    })))
}

pub async fn logout(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Json<ApiResponse<()>> {
    state.auth.revoke_tokens(user.id).await;
    tracing::info!("👋 User {} logged out", user.id);

    Json(ApiResponse::message("Logged out successfully"))
}
