use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use brainwave::{ApiError, ErrorResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::{
    AuthUser,
    password::{hash_password, verify_password},
};
use crate::entities::{LoginRequest, LoginResponse, RegisterRequest, UserResponse, user};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid email or password";

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<user::Model>, ApiError> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await?)
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(input) = payload?;
    let input = input.validated(&state.config)?;

    if find_by_email(&state, &input.email).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let created = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        email: Set(input.email),
        password_hash: Set(hash_password(&input.password)?),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(user_id = %created.id, "Registered user");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse),
        (status = 422, description = "Missing credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(input) = payload?;
    let input = input.validated()?;

    let Some(account) = find_by_email(&state, &input.email).await? else {
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    };
    if !verify_password(&input.password, &account.password_hash)? {
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let token = state.tokens.issue(account.id)?;
    tracing::debug!(user_id = %account.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn me(State(state): State<AppState>, caller: AuthUser) -> Result<Json<UserResponse>, ApiError> {
    let account = user::Entity::find_by_id(caller.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;
    Ok(Json(account.into()))
}
