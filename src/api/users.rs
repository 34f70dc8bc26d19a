use crate::api::auth::{body_error, AdminUser, REQUIRED};
use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::domain::model::{NewUser, Role, User, UserUpdate};
use crate::utils::error::{AppError, Result};
use crate::utils::validation;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn parse_role(value: &str) -> Result<Role> {
    Role::parse(value).ok_or_else(|| AppError::invalid_input("role", "Must be one of: admin, user"))
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> Result<NewUser> {
        let name = self.name.ok_or_else(|| AppError::invalid_input("name", REQUIRED))?;
        validation::validate_name("name", &name)?;

        let email = self.email.ok_or_else(|| AppError::invalid_input("email", REQUIRED))?;
        validation::validate_email("email", &email)?;

        let password = self
            .password
            .ok_or_else(|| AppError::invalid_input("password", REQUIRED))?;
        validation::validate_password("password", &password)?;

        let role = self.role.as_deref().map(parse_role).transpose()?.unwrap_or_default();

        Ok(NewUser {
            name,
            email,
            password,
            role,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl UpdateUserRequest {
    pub fn into_update(self) -> Result<UserUpdate> {
        if let Some(name) = &self.name {
            validation::validate_name("name", name)?;
        }
        if let Some(email) = &self.email {
            validation::validate_email("email", email)?;
        }
        if let Some(password) = &self.password {
            validation::validate_password("password", password)?;
        }

        Ok(UserUpdate {
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role.as_deref().map(parse_role).transpose()?,
            is_active: self.is_active,
        })
    }
}

fn user_id(path: std::result::Result<Path<u64>, PathRejection>) -> Result<u64> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound {
        message: "User not found".to_string(),
    })
}

async fn find_or_fail(state: &SharedState, id: u64) -> Result<User> {
    state.users.find(id).await.ok_or_else(|| AppError::NotFound {
        message: "User not found".to_string(),
    })
}

pub async fn index(_admin: AdminUser, State(state): State<SharedState>) -> Json<ApiResponse<Value>> {
    let users = state.users.list().await;
    let count = users.len();

    Json(ApiResponse::success(json!({ "users": users })).with_count(count))
}

pub async fn store(
    _admin: AdminUser,
    State(state): State<SharedState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>)> {
    let Json(request) = payload.map_err(body_error)?;
    let user = state.users.create(request.into_new_user()?).await?;
    tracing::info!("👤 Created user {} ({})", user.id, user.email);

    let body = ApiResponse::success(json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "is_active": user.is_active,
            "created_at": user.created_at,
        }
    }))
    .with_message("User created successfully");

    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn show(
    _admin: AdminUser,
    State(state): State<SharedState>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<ApiResponse<Value>>> {
    let user = find_or_fail(&state, user_id(path)?).await?;
    Ok(Json(ApiResponse::success(json!({ "user": user }))))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<SharedState>,
    path: std::result::Result<Path<u64>, PathRejection>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = user_id(path)?;
    find_or_fail(&state, id).await?;

    let Json(request) = payload.map_err(body_error)?;
    let user = state.users.update(id, request.into_update()?).await?;

    Ok(Json(
        ApiResponse::success(json!({
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "role": user.role,
                "is_active": user.is_active,
                "updated_at": user.updated_at,
            }
        }))
        .with_message("User updated successfully"),
    ))
}

pub async fn destroy(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>> {
    let user = find_or_fail(&state, user_id(path)?).await?;

    if user.id == admin.id {
        return Err(AppError::Forbidden {
            message: "You cannot delete your own account".to_string(),
        });
    }

    state.users.delete(user.id).await?;
    state.auth.revoke_tokens(user.id).await;
    tracing::info!("🗑️ Deleted user {}", user.id);

    Ok(Json(ApiResponse::message("User deleted successfully")))
}
