use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use crate::handlers::PageQuery;
use crate::models::NewEvent;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn create_event(
    State(state): State<AppState>,
    Json(body): Json<NewEvent>,
) -> Result<Response, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "event name must not be empty".to_string(),
        ));
    }

    let event = state.store.create_event(body).await?;
    Ok(created(event, "Event created"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event with id '{id}' was not found")))?;

    Ok(success(event, "Event found"))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let events = state.store.list_events(query.into()).await?;
    Ok(success(events, "Events listed"))
}
