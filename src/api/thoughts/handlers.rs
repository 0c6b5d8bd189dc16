use crate::api::models::*;
use crate::storage::Thought;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::info;

pub async fn list_thoughts_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Thought>>, AppError> {
    let thoughts = state.store.list_recent(THOUGHT_LIST_LIMIT).await?;
    Ok(Json(thoughts))
}

pub async fn create_thought_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateThoughtRequest>, JsonRejection>,
) -> Result<Json<Thought>, AppError> {
    let Json(request) = payload?;
    let new_thought = request.validate()?;

    let thought = state.store.insert(new_thought).await?;

    info!(id = %thought.id, "Thought created");
    Ok(Json(thought))
}

pub async fn like_thought_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Thought>, AppError> {
    let id = parse_id(&id)?;

    let thought = state
        .store
        .increment_hearts(id)
        .await?
        .ok_or(AppError::NotFound)?;

    info!(id = %thought.id, hearts = thought.hearts, "Thought liked");
    Ok(Json(thought))
}

pub async fn update_thought_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateThoughtRequest>, JsonRejection>,
) -> Result<Json<Thought>, AppError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let patch = request.validate()?;

    let thought = state
        .store
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    info!(id = %thought.id, "Thought updated");
    Ok(Json(thought))
}

pub async fn replace_thought_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceThoughtRequest>, JsonRejection>,
) -> Result<Json<Thought>, AppError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let replacement = request.validate()?;

    let thought = state
        .store
        .replace(id, replacement)
        .await?
        .ok_or(AppError::NotFound)?;

    info!(id = %thought.id, "Thought replaced");
    Ok(Json(thought))
}

pub async fn delete_thought_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Thought>, AppError> {
    let id = parse_id(&id)?;

    let thought = state
        .store
        .delete(id)
        .await?
        .ok_or(AppError::NotFound)?;

    info!(id = %thought.id, "Thought deleted");
    Ok(Json(thought))
}
