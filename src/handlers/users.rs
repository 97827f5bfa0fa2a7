use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use crate::handlers::PageQuery;
use crate::models::NewUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<Response, AppError> {
    if body.username.trim().is_empty() {
        return Err(AppError::ValidationError(
            "username must not be empty".to_string(),
        ));
    }

    let user = state.store.create_user(body).await?;
    Ok(created(user, "User registered"))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id '{id}' was not found")))?;

    Ok(success(user, "User found"))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let users = state.store.list_users(query.into()).await?;
    Ok(success(users, "Users listed"))
}
